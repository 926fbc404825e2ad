use crate::{
    config::SiteConfig,
    hooks::{
        use_active_section, use_counter, use_debounce, use_hover_delay, use_in_view,
        use_local_storage, use_parallax, use_pointer, use_scroll_progress, use_scrolled,
        use_section_navigator, use_typing, use_window_size, PointerOrigin,
    },
    latch::InViewOptions,
    logging::{self, log_event, LogLevel},
    typing::DEFAULT_TYPING_SPEED_MS,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use web_sys::window;
use yew::prelude::*;

const THEME_KEY: &str = "studio-theme";
const SECTIONS: &[&str] = &["home", "portfolio", "about", "contact"];
const HERO_TAGLINE: &str = "We animate worlds players never want to leave.";
const HERO_PARALLAX_SPEED: f64 = 0.3;
const RESIZE_SETTLE_MS: u32 = 150;
const CARD_HOVER_ENTER_MS: u32 = 120;
const CARD_HOVER_LEAVE_MS: u32 = 60;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Theme {
    Light,
    Dark,
}

impl Theme {
    fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn toggle_label(self) -> String {
        let next = self.toggled().as_str();
        format!("Switch to {next} theme")
    }
}

fn system_theme() -> Theme {
    let prefers_dark = window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false);

    if prefers_dark {
        Theme::Dark
    } else {
        Theme::Light
    }
}

fn apply_theme(theme: Theme) {
    if let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    {
        let _ = root.set_attribute("data-theme", theme.as_str());
    }
}

fn nav_label(section: &str) -> &'static str {
    match section {
        "home" => "Home",
        "portfolio" => "Portfolio",
        "about" => "About",
        "contact" => "Contact",
        _ => "",
    }
}

#[derive(Properties, PartialEq)]
struct NavbarProps {
    config: SiteConfig,
    theme: Theme,
    on_toggle_theme: Callback<()>,
}

#[function_component(Navbar)]
fn navbar(props: &NavbarProps) -> Html {
    let nav_ref = use_node_ref();
    let glow = use_pointer(PointerOrigin::Element(nav_ref.clone()));
    let scrolled = use_scrolled(props.config.scrolled_threshold_px);
    let active = use_active_section(SECTIONS, props.config.section_reference_px);
    let navigate = use_section_navigator(props.config.header_offset_px);
    let menu_open = use_state(|| false);

    let on_toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(!*menu_open))
    };

    let glow_style = format!("--glow-x: {:.1}px; --glow-y: {:.1}px;", glow.x, glow.y);
    let on_toggle_theme = props.on_toggle_theme.reform(|_: MouseEvent| ());

    html! {
        <nav
            ref={nav_ref}
            class={classes!("navbar", scrolled.then_some("is-scrolled"), menu_open.then_some("menu-open"))}
            style={glow_style}
        >
            <span class="brand">{"Pixel Forge Studio"}</span>
            <ul class="nav-links">
                { for SECTIONS.iter().map(|section| {
                    let is_active = active.as_deref() == Some(*section);
                    let onclick = {
                        let navigate = navigate.clone();
                        let menu_open = menu_open.clone();
                        let section = AttrValue::from(*section);
                        Callback::from(move |_: MouseEvent| {
                            navigate.emit(section.clone());
                            menu_open.set(false);
                        })
                    };
                    html! {
                        <li>
                            <button
                                type="button"
                                class={classes!("nav-link", is_active.then_some("is-active"))}
                                aria-current={is_active.then_some("true")}
                                onclick={onclick}
                            >
                                {nav_label(section)}
                            </button>
                        </li>
                    }
                }) }
            </ul>
            <button
                class="theme-toggle"
                type="button"
                aria-label={props.theme.toggle_label()}
                onclick={on_toggle_theme}
            />
            <button
                class="menu-toggle"
                type="button"
                aria-expanded={(*menu_open).to_string()}
                onclick={on_toggle_menu}
            >
                {"Menu"}
            </button>
        </nav>
    }
}

#[function_component(ScrollProgressBar)]
fn scroll_progress_bar() -> Html {
    let progress = use_scroll_progress();
    let style = format!("transform: scaleX({progress:.4});");

    html! { <div class="scroll-progress" style={style} aria-hidden="true" /> }
}

#[function_component(Hero)]
fn hero() -> Html {
    let tilt = use_pointer(PointerOrigin::Viewport);
    let (backdrop_ref, parallax) = use_parallax(HERO_PARALLAX_SPEED);
    let tagline = use_typing(AttrValue::from(HERO_TAGLINE), DEFAULT_TYPING_SPEED_MS, 400);

    let backdrop_style = format!("transform: translateY({parallax:.1}px);");
    let title_style = format!(
        "transform: rotateY({:.2}deg) rotateX({:.2}deg);",
        tilt.x * 6.0,
        -tilt.y * 6.0
    );

    html! {
        <section id="home" class="hero">
            <div ref={backdrop_ref} class="hero-backdrop" style={backdrop_style} aria-hidden="true" />
            <h1 style={title_style}>{"Pixel Forge Studio"}</h1>
            <p class={classes!("hero-tagline", tagline.is_complete.then_some("is-complete"))}>
                {tagline.display_text.clone()}
            </p>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct StatProps {
    target: i64,
    label: AttrValue,
    duration_ms: f64,
    #[prop_or_default]
    suffix: AttrValue,
}

#[function_component(Stat)]
fn stat(props: &StatProps) -> Html {
    let (node, in_view) = use_in_view(InViewOptions::default().with_threshold(0.5));
    let value = use_counter(if in_view { props.target } else { 0 }, props.duration_ms, 0);

    html! {
        <div ref={node} class="stat">
            <span class="stat-value">{value}{props.suffix.clone()}</span>
            <span class="stat-label">{props.label.clone()}</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct RevealProps {
    #[prop_or_default]
    class: Classes,
    children: Html,
}

#[function_component(Reveal)]
fn reveal(props: &RevealProps) -> Html {
    let (node, in_view) =
        use_in_view(InViewOptions::default().with_root_margin("0px 0px -10% 0px"));

    html! {
        <div
            ref={node}
            class={classes!("reveal", props.class.clone(), in_view.then_some("is-visible"))}
        >
            {props.children.clone()}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ProjectCardProps {
    title: AttrValue,
    genre: AttrValue,
    summary: AttrValue,
}

#[function_component(ProjectCard)]
fn project_card(props: &ProjectCardProps) -> Html {
    let hover = use_hover_delay(CARD_HOVER_ENTER_MS, CARD_HOVER_LEAVE_MS);

    html! {
        <article
            class={classes!("project-card", hover.hovered.then_some("is-hovered"))}
            onmouseenter={hover.onmouseenter.clone()}
            onmouseleave={hover.onmouseleave.clone()}
        >
            <h3>{props.title.clone()}</h3>
            <p class="muted">{props.genre.clone()}</p>
            <p class="project-summary">{props.summary.clone()}</p>
        </article>
    }
}

#[function_component(TechOrbit)]
fn tech_orbit() -> Html {
    let size = use_window_size();
    let settled = use_debounce(size, RESIZE_SETTLE_MS);
    let radius = (settled.width.min(settled.height) * 0.18).clamp(80.0, 220.0);
    let tools = ["Unreal", "Unity", "Blender", "Houdini", "Spine", "Rust"];
    let step = 360.0 / tools.len() as f64;

    html! {
        <div class="tech-orbit" aria-label="Tools we use">
            { for tools.iter().enumerate().map(|(index, tool)| {
                let style = format!(
                    "transform: rotate({angle:.1}deg) translateX({radius:.1}px) rotate(-{angle:.1}deg);",
                    angle = step * index as f64,
                );
                html! { <span class="orbit-item" style={style}>{*tool}</span> }
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    config: SiteConfig,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let theme = use_local_storage(THEME_KEY, system_theme);
    let config = props.config;
    let duration_ms = config.counter_duration_ms;

    {
        use_effect_with(theme.value(), move |theme| {
            apply_theme(*theme);
            || ()
        });
    }

    let on_toggle_theme = {
        let theme = theme.clone();
        Callback::from(move |_: ()| theme.set(theme.value().toggled()))
    };

    html! {
        <>
            <ScrollProgressBar />
            <Navbar config={config} theme={theme.value()} on_toggle_theme={on_toggle_theme} />
            <main>
                <Hero />

                <section class="stats" aria-label="Studio numbers">
                    <Stat target={500} label="animations shipped" suffix="+" duration_ms={duration_ms} />
                    <Stat target={48} label="titles credited" duration_ms={duration_ms} />
                    <Stat target={12} label="years in games" duration_ms={duration_ms} />
                    <Stat target={98} label="client retention" suffix="%" duration_ms={duration_ms} />
                </section>

                <section id="portfolio" class="section-block">
                    <Reveal><h2>{"Portfolio"}</h2></Reveal>
                    <div class="project-grid">
                        <ProjectCard title="Ember Tide" genre="Action RPG" summary="Creature rigs and combat cinematics." />
                        <ProjectCard title="Neon Drift" genre="Arcade racer" summary="Vehicle FX and UI motion." />
                        <ProjectCard title="Hollow Crown" genre="Soulslike" summary="Boss locomotion and finishers." />
                    </div>
                </section>

                <section id="about" class="section-block">
                    <Reveal><h2>{"About"}</h2></Reveal>
                    <Reveal class="timeline">
                        <ol>
                            <li>{"2013: founded as a two-person mocap shop"}</li>
                            <li>{"2018: first AAA cinematic contract"}</li>
                            <li>{"2024: real-time pipeline for live-service titles"}</li>
                        </ol>
                    </Reveal>
                    <TechOrbit />
                </section>

                <section id="contact" class="section-block">
                    <Reveal>
                        <h2>{"Contact"}</h2>
                        <p>{"hello@pixelforge.studio"}</p>
                    </Reveal>
                </section>
            </main>
            <footer class="site-footer">
                <p class="muted">{"Pixel Forge Studio"}</p>
            </footer>
        </>
    }
}

pub fn run() {
    let config = SiteConfig::from_build_env();
    logging::init(config.log_level);

    let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app"))
    else {
        log_event(LogLevel::Warn, "mount_point_missing", json!({ "id": "app" }));
        return;
    };

    log_event(
        LogLevel::Debug,
        "site_mounting",
        json!({
            "scrolledThresholdPx": config.scrolled_threshold_px,
            "sectionReferencePx": config.section_reference_px,
            "headerOffsetPx": config.header_offset_px,
            "counterDurationMs": config.counter_duration_ms,
        }),
    );

    yew::Renderer::<App>::with_root_and_props(root, AppProps { config }).render();
}
