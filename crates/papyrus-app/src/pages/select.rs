// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Select page: load a papyrus photo, click its four corners, submit, and
// follow the retrieval task until the result links appear.

use dioxus::prelude::*;

use papyrus_client::{SessionEvent, run_submission};
use papyrus_core::error::PapyrusError;
use papyrus_core::human_errors::humanize_error;

use crate::services::app_services::AppServices;
use crate::state::AppSession;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

#[component]
pub fn Select() -> Element {
    let mut session = use_context::<Signal<AppSession>>();
    let svc = use_context::<AppServices>();
    let mut load_error = use_signal(|| Option::<String>::None);

    let view = session.read().ui().clone();
    let (surface_w, surface_h) = view.surface;
    let image_box = view.image_box;
    let polygon_points = view.polygon_points();

    rsx! {
        div {
            h1 { "Papyrus Retrieval" }

            // Upload controls
            if view.upload_visible {
                section { style: "margin: 16px 0;",
                    p { style: "color: #666;", "Choose a photo, then click the four corners of the papyrus." }
                    button {
                        style: "padding: 12px 24px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white; font-size: 16px;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                let Some(path) = rfd::FileDialog::new()
                                    .add_filter("Images", IMAGE_EXTENSIONS)
                                    .pick_file()
                                else {
                                    load_error.set(Some(humanize_error(&PapyrusError::NoImageSelected).message));
                                    return;
                                };
                                session.write().set_config(svc.config());
                                let loaded = svc
                                    .open_image(&path)
                                    .and_then(|image| session.write().load_image(image));
                                match loaded {
                                    Ok(()) => load_error.set(None),
                                    Err(e) => {
                                        tracing::error!(error = %e, "image could not be shown");
                                        load_error.set(Some(humanize_error(&e).message));
                                    }
                                }
                            }
                        },
                        "Choose Image"
                    }
                    if let Some(ref msg) = *load_error.read() {
                        p { style: "color: #c0392b; font-size: 14px;", "{msg}" }
                    }
                }
            }

            // Display surface
            if let Some(url) = view.image_url.clone() {
                div {
                    style: "position: relative; width: {surface_w}px; height: {surface_h}px; cursor: crosshair; user-select: none;",
                    onclick: move |evt: MouseEvent| {
                        let p = evt.element_coordinates();
                        session.write().pointer_click(p.x, p.y);
                    },
                    onmousemove: move |evt: MouseEvent| {
                        let p = evt.element_coordinates();
                        session.write().pointer_move(p.x, p.y);
                    },
                    onmouseleave: move |_| session.write().pointer_leave(),

                    img {
                        src: "{url}",
                        draggable: "false",
                        style: "position: absolute; left: {image_box.left}px; top: {image_box.top}px; width: {image_box.width}px; height: {image_box.height}px; pointer-events: none;",
                    }
                    svg {
                        width: "{surface_w}",
                        height: "{surface_h}",
                        style: "position: absolute; left: 0; top: 0; pointer-events: none;",
                        if !view.polygon.is_empty() {
                            polygon {
                                points: "{polygon_points}",
                                fill: "rgba(255, 0, 0, 0.15)",
                                stroke: "red",
                                stroke_width: "2",
                            }
                        }
                        for (i, (x, y)) in view.markers.iter().enumerate() {
                            circle { key: "{i}", cx: "{x}", cy: "{y}", r: "5", fill: "red" }
                        }
                    }
                    if let Some(tip) = view.tooltip.clone() {
                        Coordinates { text: tip.text, x: tip.x, y: tip.y }
                    }
                }
            }

            // Actions
            div { style: "display: flex; gap: 8px; margin: 16px 0;",
                if view.redo_visible {
                    button {
                        style: "padding: 8px 16px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                        onclick: move |_| session.write().redo(),
                        "Redo"
                    }
                    button {
                        style: "padding: 8px 16px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                        onclick: move |_| {
                            session.write().go_back();
                            load_error.set(None);
                        },
                        "Go Back"
                    }
                }
                if view.submit_visible {
                    button {
                        style: "padding: 8px 16px; border-radius: 6px; border: none; background: #007aff; color: white; font-weight: bold;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                let ticket = session.write().begin_submission();
                                let api = match svc.api() {
                                    Ok(api) => api,
                                    Err(e) => {
                                        session.write().apply(ticket.generation, SessionEvent::Rejected(e));
                                        return;
                                    }
                                };
                                let interval = session.read().config().poll_interval();
                                // Owned by the root scope so leaving the page does not
                                // drop the task while the session still expects it.
                                spawn_forever(async move {
                                    let end = run_submission(&api, ticket, interval, move |generation, event| {
                                        match session.try_write() {
                                            Ok(mut session) => {
                                                session.apply(generation, event);
                                            }
                                            Err(e) => tracing::warn!(error = ?e, "session unavailable, event dropped"),
                                        }
                                    })
                                    .await;
                                    tracing::debug!(?end, "submission finished");
                                });
                            }
                        },
                        "Submit"
                    }
                }
            }

            // Status and results
            if !view.status.is_empty() {
                p { style: "font-size: 16px; margin: 8px 0;", "{view.status}" }
            }
            if !view.results.is_empty() {
                section { style: "margin: 16px 0;",
                    h3 { "Results" }
                    for (i, url) in view.results.iter().enumerate() {
                        div { key: "{i}",
                            a { href: "{url}", target: "_blank", "{url}" }
                        }
                    }
                }
            }
        }
    }
}

/// Image-space position under the pointer.
#[component]
fn Coordinates(text: String, x: f64, y: f64) -> Element {
    let left = x + 12.0;
    let top = y + 12.0;
    rsx! {
        div {
            style: "position: absolute; left: {left}px; top: {top}px; padding: 2px 6px; background: rgba(0, 0, 0, 0.75); color: white; font-size: 12px; border-radius: 4px; pointer-events: none; white-space: nowrap;",
            "{text}"
        }
    }
}
