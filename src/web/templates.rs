//! Template rendering with Tera

use crate::error::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Template renderer
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Create a new template renderer with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template("field.html", include_str!("../templates/field.html"))?;
        tera.add_raw_template("index.html", include_str!("../templates/index.html"))?;

        Ok(Self { tera })
    }

    /// Render a template with a serializable context
    pub fn render(&self, template: &str, context: &impl Serialize) -> Result<String> {
        let ctx = Context::from_serialize(context)?;
        Ok(self.tera.render(template, &ctx)?)
    }

    /// Render a template with a Tera Context
    pub fn render_with_context(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template, context)?)
    }
}
