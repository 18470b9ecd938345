//! Mounts a container with a clickable title and a subtitle into an in-memory
//! node, clicks the title a few times, and prints the result.
//!
//! ```text
//! RUST_LOG=debug cargo run -p toggle-title -- --clicks 3 --json
//! ```

use std::rc::Rc;

use anyhow::Context as _;
use clap::Parser;
use dontreact_core::prelude::*;

const HEADING_CLASS: &str = "text-5xl font-extrabold tracking-tight text-white sm:text-[5rem]";

#[derive(Clone, Debug, Default)]
struct Toggle {
    is_on: bool,
}

fn title() -> Component<&'static str, Toggle> {
    Component::with_default("Title", Toggle::default(), |title, state, cx| {
        let cx2 = cx.clone();
        let next = Toggle {
            is_on: !state.is_on,
        };
        Ok(Element::new("h1")
            .on_click(move || cx2.set_state(next.clone()))
            .class_name(HEADING_CLASS)
            .child(*title)
            .child(if state.is_on { " On" } else { " Off" })
            .with_state(state)
            .with_context(cx))
    })
}

fn subtitle() -> Component<&'static str, Toggle> {
    Component::new("Subtitle", |subtitle, state, cx| {
        Ok(Element::new("h2")
            .child(*subtitle)
            .with_state(state)
            .with_context(cx))
    })
}

fn container() -> Component<(), Toggle> {
    let (title, subtitle) = (title(), subtitle());
    let announce: Callback = Rc::new(|| log::info!("container mounted"));
    Component::with_default("Container", Toggle::default(), move |_, state, cx| {
        cx.on_mount(announce.clone());
        if cx.has_hook("run_side_effect") {
            let effect = cx.clone();
            cx.on_mount(Rc::new(move || {
                if let Err(err) = effect.run_hook("run_side_effect") {
                    log::warn!("side effect failed: {err}");
                }
            }));
        }
        Ok(Element::new("div")
            .class_name(HEADING_CLASS)
            .child(factory(&title, "Main title"))
            .child(factory(&subtitle, "Subtitle"))
            .with_state(state)
            .with_context(cx))
    })
}

/// Mount the toggle-title app and click its heading.
#[derive(Parser, Debug)]
#[command(name = "toggle-title", version, about, long_about = None)]
struct Args {
    /// How many times to click the title heading.
    #[arg(long, default_value_t = 2)]
    clicks: usize,

    /// Print JSON snapshots instead of HTML.
    #[arg(long)]
    json: bool,
}

fn print(root: &Node, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&root.snapshot())?);
    } else {
        println!("{}", root.inner_html());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let root = Node::create_element("div")?;
    root.set_attribute("id", "dontreactapp")?;

    let extras = ContextExtras::new().hook("run_side_effect", || log::info!("Effect!"));
    let app = mount(&root, &container(), (), extras)?;
    print(&root, args.json)?;

    for i in 0..args.clicks {
        let heading = root.find_by_tag("h1").context("title heading is missing")?;
        heading.click()?;
        log::debug!("click {}: {:?}", i + 1, app.state());
        print(&root, args.json)?;
    }

    let stats = app.stats();
    log::info!(
        "{} render pass(es), last took {:?}",
        stats.passes,
        stats.last_duration
    );
    app.stop()?;
    Ok(())
}
