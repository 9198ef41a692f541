// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Papyrus: corner selection and retrieval tracking
//
// Entry point. Initialises logging, services, the selection session, and
// launches the Dioxus UI.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use pages::select::Select;
use pages::settings::Settings;

use services::app_services::AppServices;
use state::{AppSession, SelectView};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Papyrus starting");

    dioxus::launch(app);
}

/// Top-level route enum.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(NavLayout)]
    #[route("/")]
    Select {},
    #[route("/settings")]
    Settings {},
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(AppServices::init);

    use_context_provider(|| svc.clone());
    use_context_provider(|| Signal::new(AppSession::new(svc.config(), SelectView::default())));

    rsx! {
        Router::<Route> {}
    }
}

/// Header navigation wrapping both pages.
#[component]
fn NavLayout() -> Element {
    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; min-height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            nav { class: "nav-bar",
                style: "display: flex; gap: 16px; padding: 8px 16px; border-bottom: 1px solid #e0e0e0; background: #fafafa;",
                Link { to: Route::Select {},
                    style: "text-decoration: none; color: #333; font-weight: bold;",
                    "Select"
                }
                Link { to: Route::Settings {},
                    style: "text-decoration: none; color: #333;",
                    "Settings"
                }
            }

            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                Outlet::<Route> {}
            }
        }
    }
}
