use crate::providers::arxiv::ArxivArticle;

/// Joins article titles and abstracts into the context block fed to the
/// divulgation prompt.
pub fn article_context(articles: &[ArxivArticle]) -> String {
    articles
        .iter()
        .map(|article| format!("Artículo: {}\nResumen: {}", article.title, article.summary))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt for a popular-science article grounded in recent research papers.
pub fn science_prompt(area: &str, context: &str, personalization_info: &str) -> String {
    format!(
        "Escribe un artículo de divulgación científica sobre {area} en un lenguaje \
         accesible para todo público. Debes incluir información de los siguientes \
         artículos de investigación recientes:\n\n{context}\n\nInformación adicional a \
         considerar: {personalization_info}\n\nEstructura el texto de manera que sea \
         comprensible, usa analogías si es necesario, y explica los conceptos técnicos \
         de forma sencilla. El objetivo es que una persona sin formación científica \
         pueda entender fácilmente el contenido."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_context_format() {
        let articles = vec![
            ArxivArticle {
                title: "Quantum widgets".to_string(),
                summary: "Widgets, but quantum.".to_string(),
                link: "http://arxiv.org/abs/1".to_string(),
            },
            ArxivArticle {
                title: "Deep gadgets".to_string(),
                summary: "Gadgets, but deep.".to_string(),
                link: "http://arxiv.org/abs/2".to_string(),
            },
        ];
        let context = article_context(&articles);
        assert_eq!(
            context,
            "Artículo: Quantum widgets\nResumen: Widgets, but quantum.\n\
             Artículo: Deep gadgets\nResumen: Gadgets, but deep."
        );
    }

    #[test]
    fn test_science_prompt_includes_context_and_area() {
        let prompt = science_prompt("física cuántica", "Artículo: X\nResumen: Y", "para niños");
        assert!(prompt.contains("divulgación científica sobre física cuántica"));
        assert!(prompt.contains("Artículo: X\nResumen: Y"));
        assert!(prompt.contains("Información adicional a considerar: para niños"));
    }
}
