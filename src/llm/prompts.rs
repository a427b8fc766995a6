use crate::models::Language;

/// System prompt shared by every generative translation call
pub const SYSTEM_PROMPT: &str = r#"You are a professional translator working in a customer service team for a betting company. You translate chat transcripts into English.

RULES:
- Do not translate entities like names of people, teams or places. Keep them in their original form.
- Keep the speaker labels CUSTOMER:, AGENT: and BOT: exactly as written.
- Do not translate the instruction string "TRANSLATE".
- Do not add explanations, examples, or any additional text. Only provide the direct English translation.
- Only translate the text provided in triple backticks (```)."#;

const EXAMPLE_TRANSLATION: &str = "CUSTOMER: What's going on with my withdrawal, it's been over 24 hours AGENT: Welcome to XXX Customer Support! My name is YYY. AGENT: I understand that this is regarding your withdrawal ZZZ. Thank you for contacting us about this. Let me take a look at how I can help you.";

/// One-shot example source text for a language code
fn example_source(code: &str) -> Option<&'static str> {
    match code {
        "de" => Some(
            "CUSTOMER: Was ist mit meiner Auszahlung los? Es sind schon mehr als 24 Stunden vergangen. AGENT: Willkommen beim XXX-Kundendienst! Mein Name ist YYY. AGENT: Ich verstehe, dass es hier um Ihren Rückzug ZZZ geht. Vielen Dank, dass Sie uns diesbezüglich kontaktiert haben. Lassen Sie mich einen Blick darauf werfen, wie ich Ihnen helfen kann.",
        ),
        "pt" => Some(
            "CUSTOMER: O que está acontecendo com meu saque já se passaram mais de 24 horas AGENT: Bem-vindo ao Suporte ao Cliente XXX! Meu nome é YYY. AGENT: Entendo que se trata de sua retirada ZZZ. Obrigado por nos contatar sobre isso. Deixe-me dar uma olhada em como posso ajudá-lo.",
        ),
        "es" => Some(
            "CUSTOMER: ¿Qué está pasando con mi retiro? Han pasado más de 24 horas AGENT: ¡Bienvenido al servicio de atención al cliente de XXX! Mi nombre es YYY. AGENT: Entiendo que esto se refiere a su retiro ZZZ. Gracias por contactarnos sobre esto. Déjame ver cómo puedo ayudarte.",
        ),
        "el" => Some(
            "CUSTOMER: Τι συμβαίνει με την απόσυρσή μου έχουν περάσει πάνω από 24 ώρες AGENT: Καλώς ήρθατε στην Υποστήριξη Πελατών XXX! Το όνομά μου είναι YYY. AGENT: Καταλαβαίνω ότι πρόκειται για την απόσυρσή σας ZZZ. Σας ευχαριστούμε που επικοινωνήσατε μαζί μας σχετικά με αυτό. Επιτρέψτε μου να ρίξω μια ματιά στο πώς μπορώ να σας βοηθήσω.",
        ),
        _ => None,
    }
}

/// Build the user prompt asking for an English translation of `text`
pub fn build_translation_prompt(text: &str, language: &Language) -> String {
    let mut prompt = format!(
        "Translate the given {} text into English.\n\n",
        language.name
    );

    if let Some(example) = example_source(&language.code) {
        prompt.push_str("Example:\nTRANSLATE:\n```\n");
        prompt.push_str(example);
        prompt.push_str("\n```\n\nAnswer:\n```\n");
        prompt.push_str(EXAMPLE_TRANSLATION);
        prompt.push_str("\n```\n\n");
    }

    prompt.push_str("Now, translate the given text:\nTRANSLATE: ```");
    prompt.push_str(text);
    prompt.push_str("```\n\nAnswer:\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerativeModel;

    #[test]
    fn test_prompt_includes_example_for_known_language() {
        let language = Language::new("Spanish", "es", GenerativeModel::Primary);
        let prompt = build_translation_prompt("CUSTOMER: hola", &language);

        assert!(prompt.starts_with("Translate the given Spanish text into English."));
        assert!(prompt.contains("Example:"));
        assert!(prompt.contains("TRANSLATE: ```CUSTOMER: hola```"));
    }

    #[test]
    fn test_prompt_without_example() {
        let language = Language::new("Italian", "it", GenerativeModel::Primary);
        let prompt = build_translation_prompt("ciao", &language);
        assert!(!prompt.contains("Example:"));
    }
}
