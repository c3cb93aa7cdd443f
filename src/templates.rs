use std::sync::OnceLock;
use tera::Tera;

static TERA: OnceLock<Tera> = OnceLock::new();

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("create_letter.html", include_str!("../templates/create_letter.html")),
    ("letter_preview.html", include_str!("../templates/letter_preview.html")),
    ("letters_log.html", include_str!("../templates/letters_log.html")),
    ("print_letter.html", include_str!("../templates/print_letter.html")),
    ("review_list.html", include_str!("../templates/review_list.html")),
    ("review_letter.html", include_str!("../templates/review_letter.html")),
];

pub fn get_tera() -> &'static Tera {
    TERA.get_or_init(|| {
        let mut tera = Tera::default();
        if let Err(e) = tera.add_raw_templates(TEMPLATES.iter().copied()) {
            tracing::error!("Failed to load templates: {}", e);
        }
        tera
    })
}
