use leptos::*;
use playground_workbench::WorkbenchApp;

#[component]
pub fn SiteApp() -> impl IntoView {
    view! {
        <main class="site-root">
            <header class="site-header">
                <h1>"LOVE Playground"</h1>
                <p>"Edit the program below; tokens and validation update as you type."</p>
            </header>
            <WorkbenchApp />
        </main>
    }
}
