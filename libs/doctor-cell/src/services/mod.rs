pub mod template;

pub use template::TemplateService;
