use desktop_runtime::{use_desktop_runtime, DesktopProvider, DesktopShell};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

/// Query parameter naming a stored file to open once the desktop has booted.
const OPEN_QUERY_PARAM: &str = "open";

fn deep_link_target(raw: Option<&String>) -> Option<String> {
    raw.map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Desktop" />
        <Meta name="description" content="A desktop operating system shell running in the browser." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="" view=DesktopEntry />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    view! {
        <DesktopProvider>
            <DeepLinkOpener />
            <DesktopShell />
        </DesktopProvider>
    }
}

/// Opens `?open=<file name>` through the open-with dispatch after the boot screen clears.
#[component]
fn DeepLinkOpener() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let query = use_query_map();
    let handled = store_value(false);

    create_effect(move |_| {
        if handled.get_value() || !runtime.state.with(|desktop| desktop.booted) {
            return;
        }
        handled.set_value(true);
        let target = query.with_untracked(|map| deep_link_target(map.get(OPEN_QUERY_PARAM)));
        if let Some(name) = target {
            runtime.open_file(&name);
        }
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn deep_link_ignores_blank_names() {
        assert_eq!(deep_link_target(None), None);
        assert_eq!(deep_link_target(Some(&"  ".to_string())), None);
        assert_eq!(
            deep_link_target(Some(&" about.txt ".to_string())),
            Some("about.txt".to_string())
        );
    }
}
