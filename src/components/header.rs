use yew::prelude::*;

/// In-page sections reachable from the nav, as `(id, label)`.
pub const NAV_SECTIONS: [(&str, &str); 4] = [
    ("features", "Features"),
    ("how-it-works", "How It Works"),
    ("testimonials", "Testimonials"),
    ("pricing", "Pricing"),
];

/// Section the logo scrolls back to.
pub const HOME_SECTION: &str = "home";

/// Section id an in-page `href` points at. A bare `#` points nowhere.
pub fn section_for_href(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub scrolled: bool,
    pub active_section: Option<String>,
    pub menu_open: bool,
    pub on_toggle_menu: Callback<()>,
    pub on_navigate: Callback<String>,
    pub on_checkout: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let HeaderProps {
        scrolled,
        active_section,
        menu_open,
        on_toggle_menu,
        on_navigate,
        on_checkout,
    } = props;

    let toggle_menu = {
        let on_toggle_menu = on_toggle_menu.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            on_toggle_menu.emit(());
        })
    };

    let go_to_checkout = {
        let on_checkout = on_checkout.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            on_checkout.emit(());
        })
    };

    let navigate = |href: &str| {
        let on_navigate = on_navigate.clone();
        let target = section_for_href(href).map(str::to_string);
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            if let Some(target) = &target {
                on_navigate.emit(target.clone());
            }
        })
    };

    let nav_link = |id: &'static str, label: &'static str| {
        let href = format!("#{}", id);
        let onclick = navigate(&href);
        let is_active = active_section.as_deref() == Some(id);
        html! {
            <li>
                <a {href} class={classes!("nav-link", is_active.then(|| "active"))} {onclick}>
                    {label}
                </a>
            </li>
        }
    };

    let home_href = format!("#{}", HOME_SECTION);

    html! {
        <header class={classes!("header", scrolled.then(|| "scrolled"))}>
            <style>
                {r#"
                    .header {
                        position: fixed;
                        top: 0;
                        left: 0;
                        right: 0;
                        z-index: 1000;
                        padding: 1.25rem 2rem;
                        background: transparent;
                        transition: background 0.3s ease, padding 0.3s ease, box-shadow 0.3s ease;
                    }
                    .header.scrolled {
                        padding: 0.75rem 2rem;
                        background: rgba(255, 255, 255, 0.95);
                        backdrop-filter: blur(10px);
                        box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.1);
                    }
                    .nav {
                        display: flex;
                        align-items: center;
                        justify-content: space-between;
                        max-width: 1200px;
                        margin: 0 auto;
                    }
                    .logo {
                        font-size: 1.5rem;
                        font-weight: 800;
                        color: #1e293b;
                        text-decoration: none;
                    }
                    .nav-links {
                        display: flex;
                        gap: 2rem;
                        list-style: none;
                        margin: 0;
                        padding: 0;
                        align-items: center;
                    }
                    .nav-link {
                        color: #475569;
                        text-decoration: none;
                        font-weight: 500;
                        transition: color 0.2s ease;
                    }
                    .nav-link:hover,
                    .nav-link.active {
                        color: #6366f1;
                    }
                    .nav-cta {
                        background: linear-gradient(135deg, #6366f1, #8b5cf6);
                        color: white;
                        padding: 0.6rem 1.25rem;
                        border-radius: 9999px;
                        text-decoration: none;
                        font-weight: 600;
                    }
                    .mobile-menu-toggle {
                        display: none;
                        background: none;
                        border: none;
                        font-size: 1.5rem;
                        cursor: pointer;
                        color: #1e293b;
                        z-index: 1001;
                    }
                    @media (max-width: 768px) {
                        .mobile-menu-toggle {
                            display: block;
                        }
                        .nav-links {
                            display: none;
                        }
                        .nav-links.mobile-open {
                            display: flex;
                            position: fixed;
                            top: 0;
                            left: 0;
                            width: 100%;
                            height: 100vh;
                            background: rgba(255, 255, 255, 0.98);
                            backdrop-filter: blur(10px);
                            flex-direction: column;
                            justify-content: center;
                            gap: 2rem;
                            z-index: 999;
                            animation: slideInFromTop 0.3s ease-out;
                        }
                    }
                    @keyframes slideInFromTop {
                        from { opacity: 0; transform: translateY(-100%); }
                        to { opacity: 1; transform: translateY(0); }
                    }
                    body.keyboard-navigation *:focus {
                        outline: 3px solid #6366f1;
                        outline-offset: 2px;
                    }
                "#}
            </style>
            <nav class="nav">
                <a href={home_href.clone()} class="logo" onclick={navigate(&home_href)}>{"EpicTech.AI"}</a>
                <button
                    class="mobile-menu-toggle"
                    aria-label="Toggle navigation"
                    aria-expanded={menu_open.to_string()}
                    onclick={toggle_menu}
                >
                    { if *menu_open { "✕" } else { "☰" } }
                </button>
                <ul class={classes!("nav-links", menu_open.then(|| "mobile-open"))}>
                    { for NAV_SECTIONS.iter().map(|&(id, label)| nav_link(id, label)) }
                    <li>
                        <a href="#demo" class="nav-cta" onclick={go_to_checkout}>{"Start Free Trial"}</a>
                    </li>
                </ul>
            </nav>
        </header>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_and_nav_links_resolve_to_sections() {
        assert_eq!(section_for_href(&format!("#{}", HOME_SECTION)), Some("home"));
        for (id, _) in NAV_SECTIONS {
            assert_eq!(section_for_href(&format!("#{}", id)), Some(id));
        }
    }

    #[test]
    fn bare_or_external_hrefs_have_no_section() {
        assert_eq!(section_for_href("#"), None);
        assert_eq!(section_for_href(""), None);
        assert_eq!(section_for_href("https://epictech.ai/#pricing"), None);
    }
}
