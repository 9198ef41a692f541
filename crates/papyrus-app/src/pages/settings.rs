// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page: backend address, display bounds, and polling cadence.

use dioxus::prelude::*;

use papyrus_core::human_errors::humanize_error;

use crate::services::app_services::AppServices;
use crate::state::AppSession;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SAVED_COLOR: &str = "#34c759";
const FAILED_COLOR: &str = "#c0392b";

#[component]
pub fn Settings() -> Element {
    let mut session = use_context::<Signal<AppSession>>();
    let svc = use_context::<AppServices>();
    let mut draft = use_signal(|| svc.config());
    let mut save_msg = use_signal(|| Option::<(&'static str, String)>::None);

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Backend" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Server URL" }
                    input {
                        r#type: "text",
                        style: "width: 260px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{draft.read().server_url}",
                        onchange: move |evt| {
                            draft.write().server_url = evt.value().trim().to_string();
                        },
                    }
                }
                NumberRow {
                    label: "Poll interval (ms)",
                    value: draft.read().poll_interval_ms as f64,
                    on_change: move |v: f64| { draft.write().poll_interval_ms = v as u64; },
                }
                NumberRow {
                    label: "Request timeout (s)",
                    value: draft.read().request_timeout_secs as f64,
                    on_change: move |v: f64| { draft.write().request_timeout_secs = v as u64; },
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Display" }
                NumberRow {
                    label: "Maximum image width (px)",
                    value: draft.read().max_display_width,
                    on_change: move |v: f64| { draft.write().max_display_width = v; },
                }
                NumberRow {
                    label: "Maximum image height (px)",
                    value: draft.read().max_display_height,
                    on_change: move |v: f64| { draft.write().max_display_height = v; },
                }
                NumberRow {
                    label: "Top padding (px)",
                    value: draft.read().display_padding,
                    on_change: move |v: f64| { draft.write().display_padding = v; },
                }
                p { style: "color: #888; font-size: 12px;",
                    "Display changes apply to the next image you load."
                }
            }

            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = draft.read().clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                tracing::info!("settings saved");
                                session.write().set_config(config);
                                save_msg.set(Some((SAVED_COLOR, "Settings saved.".into())));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                let human = humanize_error(&e);
                                save_msg.set(Some((FAILED_COLOR, format!("{} {}", human.message, human.suggestion))));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            if let Some((color, ref msg)) = *save_msg.read() {
                p { style: "color: {color}; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Papyrus v{VERSION}"
                    br {}
                    "Corner selection client for papyrus retrieval"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

/// Labelled numeric input; unparsable or negative entries are ignored.
#[component]
fn NumberRow(label: &'static str, value: f64, on_change: EventHandler<f64>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "number",
                min: "0",
                style: "width: 100px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                value: "{value}",
                onchange: move |evt| {
                    if let Ok(v) = evt.value().trim().parse::<f64>()
                        && v.is_finite()
                        && v >= 0.0
                    {
                        on_change.call(v);
                    }
                },
            }
        }
    }
}
