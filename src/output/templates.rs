use anyhow::{Context, Result};
use minijinja::{context, Environment};
use serde::Serialize;

use crate::core::BundleOutput;

const INDEX_TEMPLATE: &str = include_str!("templates/index.html");
const README_TEMPLATE: &str = include_str!("templates/README.md");

#[derive(Serialize)]
struct ModuleLink<'a> {
    fqn: &'a str,
    file: String,
}

// `.html` templates are HTML-escaped automatically, `.md` ones are not
fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_template("index.html", INDEX_TEMPLATE)
        .context("Failed to add index template")?;
    env.add_template("README.md", README_TEMPLATE)
        .context("Failed to add README template")?;
    Ok(env)
}

/// Render the docsify entry page that serves `README.md` and the module pages
pub fn render_index(title: &str) -> Result<String> {
    let env = environment()?;
    let template = env.get_template("index.html")?;
    template
        .render(context! { title })
        .context("Failed to render index template")
}

/// Render the top-level README listing every module of the bundle
pub fn render_readme(title: &str, bundle: &BundleOutput) -> Result<String> {
    let env = environment()?;

    let name = bundle
        .name
        .as_deref()
        .filter(|n| !n.is_empty() && *n != title);
    let modules: Vec<ModuleLink> = bundle
        .bundle
        .iter()
        .map(|m| ModuleLink {
            fqn: &m.fqn,
            file: m.file_name(),
        })
        .collect();

    let template = env.get_template("README.md")?;
    template
        .render(context! { title, name, modules })
        .context("Failed to render README template")
}
