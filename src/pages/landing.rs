use std::rc::Rc;

use log::{error, info};
use yew::prelude::*;

use crate::components::demo_modal::DemoModal;
use crate::components::header::{Header, HOME_SECTION};
use crate::components::notification::{use_notifications, ToastStack};
use crate::config::{CHECKOUT_URL, HERO_PARALLAX_SPEED};
use crate::dom::{self, PageContext};
use crate::error::isolate;
use crate::view_state::{ParallaxLayer, ViewState};

const HERO_CONTENT: &str = "hero-content";
const HERO_GLOW: &str = "hero-glow";

fn parallax_layers() -> Vec<ParallaxLayer> {
    vec![
        ParallaxLayer::new(HERO_CONTENT, Some(HERO_PARALLAX_SPEED)),
        // Declares no rate, so it moves at the default speed.
        ParallaxLayer::new(HERO_GLOW, None),
    ]
}

fn translate_y(offset: f64) -> String {
    format!("transform: translateY({}px);", offset)
}

struct Feature {
    key: &'static str,
    icon: &'static str,
    title: &'static str,
    body: &'static str,
}

const FEATURES: [Feature; 6] = [
    Feature {
        key: "feature-automation",
        icon: "⚡",
        title: "Instant Automation",
        body: "Turn repetitive workflows into one-click pipelines that run while you sleep.",
    },
    Feature {
        key: "feature-insights",
        icon: "📊",
        title: "Predictive Insights",
        body: "Models trained on your own data surface the trends that matter before they happen.",
    },
    Feature {
        key: "feature-security",
        icon: "🔒",
        title: "Enterprise Security",
        body: "SOC 2 controls, SSO and field-level encryption come standard on every plan.",
    },
    Feature {
        key: "feature-integrations",
        icon: "🔗",
        title: "200+ Integrations",
        body: "Connect the CRM, warehouse and chat tools your team already lives in.",
    },
    Feature {
        key: "feature-assistant",
        icon: "🤖",
        title: "AI Assistant",
        body: "Ask questions in plain English and get answers with the charts to back them.",
    },
    Feature {
        key: "feature-support",
        icon: "💬",
        title: "Human Support",
        body: "Real engineers on call around the clock, with a median reply time under five minutes.",
    },
];

const FEATURES_TITLE: &str = "features-title";
const HOW_TITLE: &str = "how-title";
const TESTIMONIALS_TITLE: &str = "testimonials-title";
const PRICING_CARD: &str = "pricing-card";

/// Onboarding steps as `(reveal key, slide-in class, number, title, body)`.
const STEPS: [(&str, Option<&str>, &str, &str, &str); 3] = [
    (
        "step-connect",
        Some("reveal-left"),
        "1",
        "Connect",
        "Link your data sources with a few clicks. No engineers required.",
    ),
    (
        "step-train",
        None,
        "2",
        "Train",
        "EpicTech learns your workflows and proposes the first automations.",
    ),
    (
        "step-launch",
        Some("reveal-right"),
        "3",
        "Launch",
        "Approve, ship and watch the hours come back to your calendar.",
    ),
];

const STATS: [(&str, i64, &str); 3] = [
    ("stat-teams", 12_500, "teams onboarded"),
    ("stat-hours", 2_400_000, "hours automated"),
    ("stat-uptime", 99, "% uptime"),
];

const TESTIMONIALS: [(&str, &str, &str, &str); 3] = [
    (
        "testimonial-maria",
        "We replaced three tools with EpicTech in a week. Reporting that took a day now takes a coffee.",
        "Maria Chen, Head of Ops at Northwind",
        "/assets/avatar-maria.webp",
    ),
    (
        "testimonial-jonas",
        "The predictive alerts caught a supply issue two weeks before it would have hurt us.",
        "Jonas Berg, COO at Fjord Logistics",
        "/assets/avatar-jonas.webp",
    ),
    (
        "testimonial-priya",
        "Setup was painless and support actually answers. That alone is worth the price.",
        "Priya Nair, Founder of Loop Studio",
        "/assets/avatar-priya.webp",
    ),
];

#[function_component(Landing)]
pub fn landing() -> Html {
    let view_state = use_state_eq(ViewState::default);
    let menu_open = use_state_eq(|| false);
    let modal_open = use_state_eq(|| false);
    let page = use_mut_ref(|| None::<Rc<PageContext>>);
    let notifications = use_notifications();

    // Build the page context once and wire every feature independently.
    {
        let view_state = view_state.setter();
        let menu_open = menu_open.setter();
        let page = page.clone();
        use_effect_with_deps(
            move |_| {
                let on_view_state = Callback::from(move |state: ViewState| view_state.set(state));
                let on_close_menu = Callback::from(move |_: ()| menu_open.set(false));

                let context = isolate("page context", || {
                    PageContext::new(parallax_layers(), on_view_state, on_close_menu)
                });
                let mut listeners = Vec::new();
                if let Some(context) = &context {
                    isolate("entrance animations", || context.install_reveal());
                    isolate("lazy images", || context.install_lazy_images());
                    if let Some(scroll) = isolate("scroll sync", || context.install_scroll_sync()) {
                        listeners.extend(scroll);
                    }
                    if let Some(keyboard) =
                        isolate("keyboard navigation", || context.install_keyboard_navigation())
                    {
                        listeners.extend(keyboard);
                    }
                    if let Some(outside) = isolate("mobile menu", || context.install_outside_click()) {
                        listeners.push(outside);
                    }
                    info!("🚀 EpicTech.AI landing page initialized");
                }
                *page.borrow_mut() = context.clone();

                move || {
                    drop(listeners);
                    if let Some(context) = context {
                        context.teardown();
                    }
                    page.borrow_mut().take();
                }
            },
            (),
        );
    }

    {
        let locked = *menu_open || *modal_open;
        use_effect_with_deps(
            move |locked| {
                isolate("scroll lock", || dom::set_scroll_locked(*locked));
                || ()
            },
            locked,
        );
    }

    let on_toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: ()| menu_open.set(!*menu_open))
    };

    let on_navigate = {
        let menu_open = menu_open.clone();
        let page = page.clone();
        Callback::from(move |section_id: String| {
            menu_open.set(false);
            let context = page.borrow().clone();
            if let Some(context) = context {
                if let Err(e) = context.scroll_to_section(&section_id) {
                    error!("Failed to scroll to {}: {}", section_id, e);
                }
            }
        })
    };

    let on_checkout = Callback::from(|_: ()| {
        if let Err(e) = dom::open_external(CHECKOUT_URL) {
            error!("Failed to open checkout: {}", e);
        }
    });

    let checkout_link = {
        let on_checkout = on_checkout.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            on_checkout.emit(());
        })
    };

    let open_modal = {
        let modal_open = modal_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            modal_open.set(true);
        })
    };

    let close_modal = {
        let modal_open = modal_open.clone();
        Callback::from(move |_: ()| modal_open.set(false))
    };

    html! {
        <div class="landing-page">
            <Header
                scrolled={view_state.is_header_scrolled}
                active_section={view_state.active_section_id.clone()}
                menu_open={*menu_open}
                {on_toggle_menu}
                {on_navigate}
                on_checkout={on_checkout.clone()}
            />

            <section id={HOME_SECTION} class="hero">
                <div id={HERO_GLOW} class="hero-glow" style={translate_y(view_state.parallax_offset(HERO_GLOW))}></div>
                <div id={HERO_CONTENT} class="hero-content" style={translate_y(view_state.parallax_offset(HERO_CONTENT))}>
                    <h1>
                        {"AI that works the way your team does"}
                        <span class="typing-cursor" aria-hidden="true">{"|"}</span>
                    </h1>
                    <p class="hero-subtitle">
                        {"EpicTech.AI automates the busywork, predicts what's next and keeps every number in one place."}
                    </p>
                    <div class="hero-cta-group">
                        <a href="#demo" class="btn btn-primary" onclick={checkout_link.clone()}>{"Start Free Trial"}</a>
                        <a href="#trial" class="btn btn-secondary" onclick={open_modal.clone()}>{"Try it with your data"}</a>
                    </div>
                </div>
            </section>

            <section id="features" class="features">
                <h2 class="section-title reveal" data-reveal={FEATURES_TITLE}>{"Everything you need to move faster"}</h2>
                <div class="feature-grid">
                    { for FEATURES.iter().map(|feature| html! {
                        <div class="feature-card reveal" data-reveal={feature.key}>
                            <div class="feature-icon">{feature.icon}</div>
                            <h3>{feature.title}</h3>
                            <p>{feature.body}</p>
                        </div>
                    }) }
                </div>
            </section>

            <section id="how-it-works" class="how-it-works">
                <h2 class="section-title reveal" data-reveal={HOW_TITLE}>{"Up and running in an afternoon"}</h2>
                <div class="steps-grid">
                    { for STEPS.iter().map(|(key, slide, number, title, body)| html! {
                        <div class={classes!("step", "reveal", *slide)} data-reveal={*key}>
                            <span class="step-number">{*number}</span>
                            <h3>{*title}</h3>
                            <p>{*body}</p>
                        </div>
                    }) }
                </div>
                <div class="stats">
                    { for STATS.iter().map(|(key, target, label)| html! {
                        <div class="stat">
                            <span class="stat-value reveal" data-reveal={*key} data-counter={target.to_string()}></span>
                            <span class="stat-label">{*label}</span>
                        </div>
                    }) }
                </div>
            </section>

            <section id="testimonials" class="testimonials">
                <h2 class="section-title reveal" data-reveal={TESTIMONIALS_TITLE}>{"Teams that switched never looked back"}</h2>
                <div class="testimonial-grid">
                    { for TESTIMONIALS.iter().map(|(key, quote, author, avatar)| html! {
                        <figure class="testimonial-card reveal" data-reveal={*key}>
                            <blockquote>{*quote}</blockquote>
                            <figcaption>
                                <img class="avatar lazy" data-src={*avatar} alt={*author} width="48" height="48" />
                                {*author}
                            </figcaption>
                        </figure>
                    }) }
                </div>
            </section>

            <section id="pricing" class="pricing">
                <div class="pricing-card reveal" data-reveal={PRICING_CARD}>
                    <h2>{"One plan. Everything included."}</h2>
                    <p class="price"><span class="amount">{"$49"}</span>{" / seat / month"}</p>
                    <ul>
                        <li>{"✓ Unlimited automations"}</li>
                        <li>{"✓ Predictive insights"}</li>
                        <li>{"✓ Every integration"}</li>
                        <li>{"✓ 24/7 human support"}</li>
                    </ul>
                    <a href="#demo" class="btn btn-primary" onclick={checkout_link.clone()}>{"Start Free Trial"}</a>
                    <a href="#trial" class="btn-link" onclick={open_modal}>{"Not sure yet? Start a trial without a card"}</a>
                </div>
            </section>

            <footer class="footer">
                <p>{"© EpicTech.AI. All rights reserved."}</p>
            </footer>

            <DemoModal
                open={*modal_open}
                on_close={close_modal}
                on_notify={notifications.notify.clone()}
            />
            <ToastStack toasts={notifications.queue.toasts.clone()} />

            <style>
                {r#"
                    :root {
                        --scroll-progress: 0;
                    }
                    body.scroll-locked {
                        overflow: hidden;
                    }
                    .landing-page {
                        font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
                        color: #1e293b;
                    }
                    .landing-page::before {
                        content: '';
                        position: fixed;
                        top: 0;
                        left: 0;
                        height: 3px;
                        width: calc(var(--scroll-progress) * 100%);
                        background: linear-gradient(90deg, #6366f1, #ec4899);
                        z-index: 1002;
                    }
                    section {
                        padding: 6rem 2rem;
                    }
                    .hero {
                        position: relative;
                        min-height: 100vh;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        overflow: hidden;
                        text-align: center;
                        background: linear-gradient(135deg, #eef2ff 0%, #fdf2f8 100%);
                    }
                    .hero-glow {
                        position: absolute;
                        top: 10%;
                        left: 50%;
                        width: 600px;
                        height: 600px;
                        margin-left: -300px;
                        border-radius: 50%;
                        background: radial-gradient(circle, rgba(99, 102, 241, 0.25), transparent 70%);
                        pointer-events: none;
                        will-change: transform;
                    }
                    .hero-content {
                        position: relative;
                        max-width: 800px;
                        will-change: transform;
                    }
                    .hero h1 {
                        font-size: clamp(2.5rem, 6vw, 4rem);
                        font-weight: 800;
                        line-height: 1.1;
                    }
                    .typing-cursor {
                        animation: blink 1s infinite;
                        color: #ffd700;
                        font-weight: 300;
                    }
                    @keyframes blink {
                        0%, 50% { opacity: 1; }
                        51%, 100% { opacity: 0; }
                    }
                    .hero-cta-group {
                        display: flex;
                        gap: 1rem;
                        justify-content: center;
                        flex-wrap: wrap;
                        margin-top: 2rem;
                    }
                    .btn {
                        display: inline-block;
                        padding: 0.9rem 1.75rem;
                        border-radius: 9999px;
                        font-weight: 600;
                        text-decoration: none;
                    }
                    .btn-primary {
                        background: linear-gradient(135deg, #6366f1, #8b5cf6);
                        color: white;
                    }
                    .btn-secondary {
                        background: white;
                        color: #6366f1;
                        border: 1px solid #c7d2fe;
                    }
                    .btn-link {
                        display: block;
                        margin-top: 1rem;
                        color: #6366f1;
                    }
                    .section-title {
                        text-align: center;
                        font-size: 2.25rem;
                        margin-bottom: 3rem;
                    }
                    .feature-grid,
                    .steps-grid,
                    .testimonial-grid {
                        display: grid;
                        grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
                        gap: 2rem;
                        max-width: 1200px;
                        margin: 0 auto;
                    }
                    .feature-card,
                    .testimonial-card,
                    .step,
                    .pricing-card {
                        background: white;
                        border-radius: 1rem;
                        padding: 2rem;
                        box-shadow: 0 10px 15px -3px rgba(0, 0, 0, 0.08);
                    }
                    .feature-icon {
                        font-size: 2rem;
                    }
                    .step-number {
                        font-size: 2rem;
                        font-weight: 800;
                        color: #6366f1;
                    }
                    .stats {
                        display: flex;
                        justify-content: center;
                        gap: 4rem;
                        margin-top: 4rem;
                        flex-wrap: wrap;
                    }
                    .stat {
                        text-align: center;
                    }
                    .stat-value {
                        display: block;
                        font-size: 3rem;
                        font-weight: 800;
                        color: #6366f1;
                        min-height: 3.6rem;
                    }
                    .testimonial-card figcaption {
                        display: flex;
                        align-items: center;
                        gap: 0.75rem;
                        margin-top: 1rem;
                        font-weight: 600;
                    }
                    .avatar {
                        border-radius: 50%;
                        background: #e2e8f0;
                    }
                    .avatar.lazy {
                        opacity: 0;
                    }
                    .pricing-card {
                        max-width: 480px;
                        margin: 0 auto;
                        text-align: center;
                    }
                    .pricing-card ul {
                        list-style: none;
                        padding: 0;
                        line-height: 2;
                    }
                    .amount {
                        font-size: 3rem;
                        font-weight: 800;
                    }
                    .footer {
                        text-align: center;
                        padding: 2rem;
                        color: #64748b;
                    }
                    .reveal {
                        opacity: 0;
                        transform: translateY(30px);
                        transition: opacity 0.6s ease-out, transform 0.6s ease-out;
                    }
                    .reveal.reveal-left {
                        transform: translateX(-30px);
                    }
                    .reveal.reveal-right {
                        transform: translateX(30px);
                    }
                    .reveal.revealed {
                        opacity: 1;
                        transform: none;
                    }
                    @media (prefers-reduced-motion: reduce) {
                        .reveal {
                            opacity: 1;
                            transform: none;
                            transition: none;
                        }
                    }
                "#}
            </style>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn hero_layers_use_expected_speeds() {
        let layers = parallax_layers();
        assert_eq!(layers[0].offset(200.0), -100.0);
        assert_eq!(layers[1].offset(200.0), -100.0);
    }

    #[test]
    fn reveal_keys_are_unique() {
        let mut keys = HashSet::new();
        let all = [FEATURES_TITLE, HOW_TITLE, TESTIMONIALS_TITLE, PRICING_CARD]
            .into_iter()
            .chain(FEATURES.iter().map(|feature| feature.key))
            .chain(STEPS.iter().map(|(key, _, _, _, _)| *key))
            .chain(STATS.iter().map(|(key, _, _)| *key))
            .chain(TESTIMONIALS.iter().map(|(key, _, _, _)| *key));
        for key in all {
            assert!(keys.insert(key), "duplicate reveal key {}", key);
        }
    }

    #[test]
    fn translate_y_formats_pixels() {
        assert_eq!(translate_y(-12.5), "transform: translateY(-12.5px);");
    }
}
