use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

/// Templates and partials, embedded in the binary
const PARTIALS: [(&str, &str); 2] = [
    ("header", include_str!("../templates/partials/header.hbs")),
    ("footer", include_str!("../templates/partials/footer.hbs")),
];

const PAGES: [(&str, &str); 4] = [
    ("landing", include_str!("../templates/landing.hbs")),
    ("login", include_str!("../templates/login.hbs")),
    ("signup", include_str!("../templates/signup.hbs")),
    ("feed", include_str!("../templates/feed.hbs")),
];

/// # HTML pages of the application
///
/// Values are HTML escaped on rendering.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();

        for (name, partial) in PARTIALS {
            registry.register_partial(name, partial)?;
        }
        for (name, page) in PAGES {
            registry.register_template_string(name, page)?;
        }

        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, page: &str, data: &T) -> Result<String, RenderError> {
        self.registry.render(page, data)
    }
}
