//! Tera-backed renderer.

use std::{collections::HashMap, error::Error as _};

use kscaff_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{FuncMap, TemplateFn},
    error::KscaffResult,
};
use tera::{Context, Tera, Value};
use tracing::instrument;

/// Renders template bodies with Tera.
///
/// Every call builds a fresh one-off Tera instance with autoescaping off
/// and the supplied functions registered as filters, replacing any Tera
/// builtin of the same name. Undefined variables are render errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeraRenderer;

impl TeraRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for TeraRenderer {
    #[instrument(skip_all, fields(template = name))]
    fn render(
        &self,
        name: &str,
        body: &str,
        data: &serde_json::Value,
        funcs: &FuncMap,
    ) -> KscaffResult<String> {
        let render_error = |reason: String| ApplicationError::Render {
            path: name.to_string(),
            reason,
        };

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        for (&filter, &func) in funcs {
            tera.register_filter(filter, string_filter(filter, func));
        }

        let context = Context::from_serialize(data).map_err(|e| render_error(describe(&e)))?;
        tera.render_str(body, &context)
            .map_err(|e| render_error(describe(&e)).into())
    }
}

fn string_filter(
    name: &'static str,
    func: TemplateFn,
) -> impl Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync {
    move |value, _args| match value {
        Value::String(s) => Ok(Value::String(func(s))),
        other => Err(tera::Error::msg(format!(
            "filter `{name}` expects a string, got {other}"
        ))),
    }
}

/// Tera nests the useful message in the error source chain.
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
