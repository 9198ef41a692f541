// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state: the selection session and the view model the
// session draws into. Pages render straight from `SelectView`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use papyrus_client::{Session, UiAdapter};
use papyrus_core::types::ScaleTransform;
use papyrus_document::SourceImage;

/// The session shared by all pages via `use_context::<Signal<AppSession>>()`.
pub type AppSession = Session<SelectView>;

/// Where the image sits on the display surface, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Everything the selection page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectView {
    /// `data:` URL of the loaded image; `None` hides the surface.
    pub image_url: Option<String>,
    pub image_box: ImageBox,
    /// Display surface size, padding included.
    pub surface: (f64, f64),
    pub markers: Vec<(f64, f64)>,
    pub polygon: Vec<(f64, f64)>,
    pub upload_visible: bool,
    pub submit_visible: bool,
    pub redo_visible: bool,
    pub tooltip: Option<Tooltip>,
    pub status: String,
    pub results: Vec<String>,
}

impl Default for SelectView {
    fn default() -> Self {
        Self {
            image_url: None,
            image_box: ImageBox::default(),
            surface: (0.0, 0.0),
            markers: Vec::new(),
            polygon: Vec::new(),
            upload_visible: true,
            submit_visible: false,
            redo_visible: false,
            tooltip: None,
            status: String::new(),
            results: Vec::new(),
        }
    }
}

impl SelectView {
    /// The polygon as an SVG `points` attribute.
    pub fn polygon_points(&self) -> String {
        self.polygon
            .iter()
            .map(|(x, y)| format!("{x},{y}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl UiAdapter for SelectView {
    fn render_image(&mut self, image: &SourceImage, transform: &ScaleTransform) {
        self.image_url = Some(format!(
            "data:{};base64,{}",
            image.mime_type(),
            STANDARD.encode(image.bytes())
        ));
        self.image_box = ImageBox {
            left: transform.offset_x,
            top: transform.offset_y,
            width: f64::from(image.width()) * transform.scale_x,
            height: f64::from(image.height()) * transform.scale_y,
        };
        self.surface = transform.surface_size(image.width(), image.height());
    }

    fn clear_surface(&mut self) {
        self.image_url = None;
        self.image_box = ImageBox::default();
        self.surface = (0.0, 0.0);
        self.markers.clear();
        self.polygon.clear();
    }

    fn draw_points(&mut self, points: &[(f64, f64)]) {
        self.markers = points.to_vec();
        self.polygon.clear();
    }

    fn draw_polygon(&mut self, vertices: &[(f64, f64)]) {
        self.polygon = vertices.to_vec();
        self.markers.clear();
    }

    fn set_upload_visible(&mut self, visible: bool) {
        self.upload_visible = visible;
    }

    fn set_submit_visible(&mut self, visible: bool) {
        self.submit_visible = visible;
    }

    fn set_redo_visible(&mut self, visible: bool) {
        self.redo_visible = visible;
    }

    fn show_tooltip(&mut self, text: &str, display_x: f64, display_y: f64) {
        self.tooltip = Some(Tooltip {
            text: text.to_string(),
            x: display_x,
            y: display_y,
        });
    }

    fn hide_tooltip(&mut self) {
        self.tooltip = None;
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn show_results(&mut self, urls: &[String]) {
        self.results = urls.to_vec();
    }
}
