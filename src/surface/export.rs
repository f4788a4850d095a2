// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use super::RenderSurface;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("render surface cannot capture images")]
    Unsupported,
    #[error("image capture failed: {0}")]
    Capture(String),
    #[error("image capture produced no data")]
    Empty,
}

/// A captured diagram ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

fn slug_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static slug pattern"))
}

/// `My Mind Map!` becomes `my-mind-map.png`; titles with no usable characters become
/// `diagram.png`.
pub fn export_file_name(title: &str) -> String {
    let lowered = title.to_lowercase();
    let slug = slug_separator().replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "diagram.png".to_owned()
    } else {
        format!("{slug}.png")
    }
}

/// Captures the surface. Only the surface is touched, so a failure leaves the graph as it was.
pub fn export_diagram(
    surface: &mut dyn RenderSurface,
    title: &str,
) -> Result<ImageExport, ExportError> {
    let file_name = export_file_name(title);
    let bytes = surface.export_image(title).map_err(|err| {
        warn!(%file_name, "diagram export failed: {err}");
        err
    })?;
    if bytes.is_empty() {
        warn!(%file_name, "diagram export returned no data");
        return Err(ExportError::Empty);
    }
    info!(%file_name, bytes = bytes.len(), "exported diagram image");
    Ok(ImageExport { file_name, bytes })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{export_diagram, export_file_name, ExportError};
    use crate::surface::{HeadlessSurface, RenderSurface};

    struct FixedSurface(Vec<u8>);

    impl RenderSurface for FixedSurface {
        fn fit_view(&mut self) {}

        fn export_image(&mut self, _title: &str) -> Result<Vec<u8>, ExportError> {
            Ok(self.0.clone())
        }

        fn apply_layout(&mut self) {}
    }

    #[rstest]
    #[case("My Mind Map!", "my-mind-map.png")]
    #[case("  Q3 roadmap / v2  ", "q3-roadmap-v2.png")]
    #[case("", "diagram.png")]
    #[case("!!!", "diagram.png")]
    fn file_name_is_slugified(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(export_file_name(title), expected);
    }

    #[test]
    fn export_reports_surface_failures() {
        let err = export_diagram(&mut HeadlessSurface::default(), "x").unwrap_err();
        assert_eq!(err, ExportError::Unsupported);

        let err = export_diagram(&mut FixedSurface(Vec::new()), "x").unwrap_err();
        assert_eq!(err, ExportError::Empty);
    }

    #[test]
    fn export_names_the_captured_image() {
        let mut surface = FixedSurface(vec![0x89, b'P', b'N', b'G']);
        let export = export_diagram(&mut surface, "Plan").expect("export");
        assert_eq!(export.file_name, "plan.png");
        assert_eq!(export.bytes.len(), 4);
    }
}
