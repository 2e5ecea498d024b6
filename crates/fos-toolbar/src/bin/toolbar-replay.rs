//! Toolbar Replay - mount the toolbar on a sample page, press controls and
//! print the resulting settings.
//!
//! ```text
//! toolbar-replay [--config FILE] [--store DIR] [--width PX] [CONTROL...]
//! ```
//!
//! `CONTROL` is a setting name (`darkmode`, `align-left`, ...) or a slider
//! name followed by `+` or `-` (`font-size-slider+`). Settings persist in
//! the store directory between runs.

use anyhow::{bail, Context, Result};
use fos_dom::{Document, NodeId};
use fos_toolbar::{FileStore, HeadlessHost, MemoryStore, Toolbar, ToolbarConfig};
use tracing_subscriber::EnvFilter;

struct Args {
    config: Option<String>,
    store: Option<String>,
    width: f64,
    controls: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { config: None, store: None, width: 1280.0, controls: Vec::new() };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = Some(it.next().context("--config needs a file")?),
            "--store" => args.store = Some(it.next().context("--store needs a directory")?),
            "--width" => {
                let raw = it.next().context("--width needs a number")?;
                args.width = raw.parse().with_context(|| format!("invalid width {raw:?}"))?;
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => args.controls.push(arg),
        }
    }
    Ok(args)
}

/// Article page with headings, links, a main region and a coloured aside
fn sample_page() -> Result<Document> {
    let mut doc = Document::new("https://example.test/article");
    doc.set_attr(doc.document_element(), "lang", "en-GB");
    let body = doc.body().context("sample page has no body")?;
    
    let nav = doc.append_element(body, "nav")?;
    let home = doc.append_element(nav, "a")?;
    doc.set_attr(home, "href", "/");
    doc.append_text(home, "Home")?;
    
    let main = doc.append_element(body, "main")?;
    let h1 = doc.append_element(main, "h1")?;
    doc.append_text(h1, "Reading on the web")?;
    for text in ["Accessible pages adapt to their readers.", "Settings persist between visits."] {
        let p = doc.append_element(main, "p")?;
        doc.set_computed(p, "font-size", "16px");
        doc.set_computed(p, "line-height", "24px");
        doc.append_text(p, text)?;
    }
    
    let aside = doc.append_element(body, "aside")?;
    doc.set_computed(aside, "background", "rgb(240, 240, 240)");
    doc.append_text(aside, "Related reading")?;
    
    let script = doc.append_element(body, "script")?;
    doc.append_text(script, "analytics()")?;
    Ok(doc)
}

fn press(toolbar: &mut Toolbar, control: &str) -> Result<()> {
    let (name, step) = match control.strip_suffix('+') {
        Some(name) => (name, Some("range-plus-button")),
        None => match control.strip_suffix('-') {
            Some(name) => (name, Some("range-minus-button")),
            None => (control, None),
        },
    };
    let node = toolbar.control(name).with_context(|| format!("no control named {name:?}"))?;
    let target: NodeId = match step {
        Some(ident) => toolbar.panel()
            .find_within(toolbar.document(), node, ident)
            .with_context(|| format!("{name:?} is not a slider"))?,
        None => node,
    };
    toolbar.click(target);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            ToolbarConfig::from_json(&json)?
        }
        None => ToolbarConfig::default(),
    };
    
    let builder = Toolbar::builder(sample_page()?, HeadlessHost::new(args.width)).config(config);
    let builder = match &args.store {
        Some(dir) => builder.storage(FileStore::open(dir)?),
        None => builder.storage(MemoryStore::new()),
    };
    let mut toolbar = builder.mount()?;
    
    for control in &args.controls {
        press(&mut toolbar, control)?;
    }
    
    let doc = toolbar.document();
    let mut set = serde_json::Map::new();
    for (key, value) in toolbar.status().iter().filter(|(_, v)| v.is_truthy()) {
        set.insert(key.to_string(), serde_json::to_value(value)?);
    }
    println!("{}", serde_json::to_string_pretty(&set)?);
    println!("root: {}", doc.class_name(doc.document_element()));
    println!("panel: {}", doc.class_name(toolbar.panel().wrapper()));
    Ok(())
}
