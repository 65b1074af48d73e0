//! License header shared by every generated Go file.

use kscaff_core::domain::{
    DomainError, IfExistsAction, Template, TemplateBody, TemplateContext, TemplateSpec,
};
use serde::Serialize;

pub const DEFAULT_BOILERPLATE_PATH: &str = "hack/boilerplate.go.txt";

/// Licenses the boilerplate knows how to render.
pub const LICENSES: &[&str] = &["apache2", "none"];

#[derive(Debug, Serialize)]
pub struct Boilerplate {
    #[serde(flatten)]
    ctx: TemplateContext,
    pub license: String,
    pub owner: Option<String>,
    pub year: i32,
}

impl Boilerplate {
    pub fn new(license: impl Into<String>, owner: Option<String>, year: i32) -> Self {
        Self {
            ctx: TemplateContext::default(),
            license: license.into(),
            owner,
            year,
        }
    }
}

builder!(Boilerplate, []);

impl Template for Boilerplate {
    fn spec(&self) -> TemplateSpec {
        TemplateSpec {
            path: DEFAULT_BOILERPLATE_PATH.into(),
            body: TemplateBody::Parameterized(BOILERPLATE),
            if_exists: IfExistsAction::Error,
        }
    }

    fn set_defaults(&mut self) -> Result<(), DomainError> {
        if !LICENSES.contains(&self.license.as_str()) {
            return Err(DomainError::UnknownLicense {
                name: self.license.clone(),
            });
        }
        Ok(())
    }
}

const BOILERPLATE: &str = r#"/*
{% if owner %}Copyright {{ year }} {{ owner }}.{% else %}Copyright {{ year }}.{% endif %}
{%- if license == "apache2" %}

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
{%- endif %}
*/
"#;
