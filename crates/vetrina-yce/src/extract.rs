// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result normalization over the provider's response shapes.
//!
//! The provider has shipped the result URL under several different field
//! names. The chain here is ordered by how current each shape is: when the
//! nested `results` object is present it is authoritative and the legacy
//! top-level fields are not consulted.

use crate::types::TaskData;

/// Extract the result image URL from a terminal payload.
///
/// Priority: `results.{result_url, url, image_url, output_url}` when the
/// nested object is present; otherwise top-level `result_url`, `resultUrl`,
/// then array-form `result[0].{url, result_url}`. Returns `None` when no
/// shape matches; the caller must treat that as a failure, not a success
/// with a missing image.
pub fn extract_result_url(data: &TaskData) -> Option<&str> {
    if let Some(results) = &data.results {
        return results
            .result_url
            .as_deref()
            .or(results.url.as_deref())
            .or(results.image_url.as_deref())
            .or(results.output_url.as_deref());
    }

    data.result_url
        .as_deref()
        .or(data.result_url_camel.as_deref())
        .or_else(|| {
            let first = data.result.as_ref()?.first()?;
            first.url.as_deref().or(first.result_url.as_deref())
        })
}

/// Extract the mask/segmentation URL, best-effort.
///
/// Priority: `results.mask_url`, top-level `mask_url`,
/// `results.segmentation_url`. Absence is not an error; not every category
/// produces mask data.
pub fn extract_mask_url(data: &TaskData) -> Option<&str> {
    data.results
        .as_ref()
        .and_then(|r| r.mask_url.as_deref())
        .or(data.mask_url.as_deref())
        .or_else(|| {
            data.results
                .as_ref()
                .and_then(|r| r.segmentation_url.as_deref())
        })
}
