use crate::content::{ContentRequest, Platform};

/// Builds the generation prompt for a content request. Deterministic: the
/// same request always composes the same string. Each known platform gets its
/// own register; anything else falls back to the generic template.
pub fn compose(request: &ContentRequest) -> String {
    let tone = request.tone.prompt_word();
    let language = request.language.prompt_name();
    let audience = &request.audience;
    let topic = &request.topic;

    let mut prompt = match &request.platform {
        Platform::LinkedIn => format!(
            "Escribe un {tone} post en {language} para LinkedIn dirigido a {audience}. \
             El tema es: {topic}. El contenido debe ser profesional, informativo y \
             adecuado para una audiencia de LinkedIn."
        ),
        Platform::Twitter => format!(
            "Escribe un {tone} tweet en {language} para Twitter dirigido a {audience}. \
             El tema es: {topic}. El contenido debe ser breve y atractivo, adaptado a \
             los 280 caracteres de Twitter."
        ),
        Platform::Blog => format!(
            "Escribe un {tone} artículo en {language} para un blog dirigido a {audience}. \
             El tema es: {topic}. El contenido debe ser detallado, con un enfoque \
             educativo y profesional."
        ),
        Platform::Instagram => format!(
            "Escribe un {tone} post en {language} para Instagram dirigido a {audience}. \
             El tema es: {topic}. El contenido debe ser visual, creativo y adaptado al \
             formato de Instagram, con un enfoque más informal."
        ),
        Platform::Other(platform) => format!(
            "Escribe un {tone} post en {language} para {platform} dirigido a {audience}. \
             El tema es: {topic}."
        ),
    };

    if let Some(info) = request
        .personalization_info
        .as_deref()
        .filter(|info| !info.trim().is_empty())
    {
        prompt.push_str(&format!(
            " La información adicional sobre la empresa o persona es: {info}."
        ));
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Language, Tone};

    fn request(platform: Platform) -> ContentRequest {
        ContentRequest {
            topic: "productividad remota".to_string(),
            audience: "gerentes de IT".to_string(),
            platform,
            tone: Tone::Informal,
            language: Language::English,
            model: None,
            personalization_info: None,
        }
    }

    #[test]
    fn test_each_platform_selects_its_template() {
        let linkedin = compose(&request(Platform::LinkedIn));
        assert!(linkedin.contains("para LinkedIn"));
        assert!(linkedin.contains("profesional, informativo"));

        let blog = compose(&request(Platform::Blog));
        assert!(blog.contains("artículo"));
        assert!(blog.contains("enfoque educativo"));

        let instagram = compose(&request(Platform::Instagram));
        assert!(instagram.contains("formato de Instagram"));
    }

    #[test]
    fn test_twitter_example_prompt() {
        // Worked example: informal tweet in English about remote productivity.
        let prompt = compose(&request(Platform::Twitter));
        assert!(prompt.starts_with("Escribe un informal tweet en Inglés para Twitter"));
        assert!(prompt.contains("dirigido a gerentes de IT"));
        assert!(prompt.contains("El tema es: productividad remota."));
        assert!(prompt.contains("breve y atractivo"));
        assert!(prompt.contains("280 caracteres"));
    }

    #[test]
    fn test_unknown_platform_uses_generic_template() {
        let prompt = compose(&request(Platform::Other("Mastodon".to_string())));
        assert!(prompt.contains("para Mastodon"));
        assert!(prompt.ends_with("El tema es: productividad remota."));
        assert!(!prompt.contains("El contenido debe ser"));
    }

    #[test]
    fn test_personalization_clause_only_when_present() {
        let mut with_info = request(Platform::LinkedIn);
        with_info.personalization_info = Some("startup de logística".to_string());
        let prompt = compose(&with_info);
        assert!(prompt
            .ends_with("La información adicional sobre la empresa o persona es: startup de logística."));

        let without = compose(&request(Platform::LinkedIn));
        assert!(!without.contains("información adicional"));

        // Whitespace-only personalization counts as empty.
        let mut blank = request(Platform::LinkedIn);
        blank.personalization_info = Some("   ".to_string());
        assert!(!compose(&blank).contains("información adicional"));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let req = request(Platform::Twitter);
        assert_eq!(compose(&req), compose(&req));
    }
}
