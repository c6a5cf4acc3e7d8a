/// Instructions sent ahead of every wine name.
pub const WINE_PROMPT_TEMPLATE: &str = "\
Forneça informações detalhadas sobre o vinho indicado abaixo, organizadas nos seguintes tópicos:
1. Produtor e região de origem.
2. Uvas utilizadas e estilo do vinho.
3. Notas de degustação (aroma, paladar e final).
4. Temperatura ideal de serviço e potencial de guarda.
5. Sugestões de harmonização com pratos.
6. Faixa de preço aproximada.
Se o vinho não for identificado com segurança, diga isso claramente e sugira vinhos semelhantes.";

/// Label placed before the wine name.
pub const WINE_NAME_LABEL: &str = "Nome do vinho: ";

/// Used in place of the name when none was supplied.
pub const MISSING_NAME_PHRASE: &str = "Nenhum nome fornecido";

/// Role instruction sent as the system message.
pub const SYSTEM_INSTRUCTION: &str = "Você é um assistente especializado em vinhos.";

/// User content sent when the built prompt is empty.
pub const EMPTY_PROMPT_FALLBACK: &str = "detalhes sobre o vinho";

/// Joins `template` with the wine name, or [`MISSING_NAME_PHRASE`] when the
/// name is absent or blank.
pub fn build_prompt(template: &str, wine_name: Option<&str>) -> String {
    let name = wine_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(MISSING_NAME_PHRASE);

    format!("{template}\n{WINE_NAME_LABEL}{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_template_then_name() {
        let prompt = build_prompt(WINE_PROMPT_TEMPLATE, Some("Vinho do Porto 10 anos"));
        assert!(prompt.starts_with(WINE_PROMPT_TEMPLATE));
        assert!(prompt.ends_with("Nome do vinho: Vinho do Porto 10 anos"));

        let template_end = prompt.find(WINE_PROMPT_TEMPLATE).unwrap() + WINE_PROMPT_TEMPLATE.len();
        let name_at = prompt.find("Vinho do Porto 10 anos").unwrap();
        assert!(name_at > template_end);
    }

    #[test]
    fn name_is_trimmed() {
        let prompt = build_prompt("T", Some("  Pera-Manca  "));
        assert_eq!(prompt, "T\nNome do vinho: Pera-Manca");
    }

    #[test]
    fn absent_name_uses_fallback_phrase() {
        let prompt = build_prompt("T", None);
        assert_eq!(prompt, format!("T\n{WINE_NAME_LABEL}{MISSING_NAME_PHRASE}"));
    }

    #[test]
    fn blank_name_uses_fallback_phrase() {
        for blank in ["", "   ", "\t\n"] {
            let prompt = build_prompt(WINE_PROMPT_TEMPLATE, Some(blank));
            assert!(prompt.ends_with(MISSING_NAME_PHRASE), "input {blank:?}");
            assert!(!prompt.ends_with(WINE_NAME_LABEL));
        }
    }

    #[test]
    fn same_inputs_give_same_prompt() {
        let first = build_prompt(WINE_PROMPT_TEMPLATE, Some("Barca Velha"));
        let second = build_prompt(WINE_PROMPT_TEMPLATE, Some("Barca Velha"));
        assert_eq!(first, second);
    }
}
