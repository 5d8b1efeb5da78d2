use leptos::*;
use leptos_meta::*;
use leptos_router::*;

pub mod api;
mod pages;
pub mod table;
pub mod utils;

use pages::{AlertsPage, Login, TeamsPage};

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/netwatch-ui.css"/>
        <Title text="Netwatch - Network Alert Management"/>
        <Meta name="description" content="Netwatch Network Alert Dashboard"/>

        <Router>
            <nav class="navbar">
                <div class="navbar-brand">
                    <h1>"Netwatch"</h1>
                    <span class="tagline">"Network Alert Management"</span>
                </div>
                <div class="navbar-menu">
                    <A href="/" class="navbar-item">"Alerts"</A>
                    <A href="/teams" class="navbar-item">"Teams"</A>
                    <A href="/login" class="navbar-item">"Login"</A>
                </div>
            </nav>

            <main class="container">
                <Routes>
                    <Route path="/" view=AlertsPage/>
                    <Route path="/teams" view=TeamsPage/>
                    <Route path="/login" view=Login/>
                </Routes>
            </main>

            <footer class="footer">
                <p>"Netwatch v0.1.0 - Built with Rust + Leptos"</p>
            </footer>
        </Router>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
