//! Fixed prompt templates sent to the text models.

/// Prompt used by `/api/test` to check that the API key works.
pub const API_TEST_PROMPT: &str = "Hello, world!";

/// Instruction asking the model to turn lab experiment content into a short
/// Imagen prompt for a VR lab station.
pub fn image_prompt_instruction(experiment_details: &str) -> String {
    format!(
        r#"
        Imagine an interactive vr lab station where the student stands inside a circular table with an open entryway. The table is filled with various experiment-related items, each corresponding to specific chapters of study. The user can reach out, grab objects, and interact with them to conduct hands-on experiments. The setup should support multiple experiments covering the key intents of the chapters, ensuring an immersive and educational experience. If a circular table is not feasible, AI can suggest an alternative rectangular table with an open entry design that maintains accessibility and engagement.generate a prompt for an image generation AI to illustrate the following paragraph from an lab experiment content:

        "{experiment_details}"

        Imagen usage guidelines:
        - Images must adhere to safety guidelines and avoid harmful content
        - Images should be accurate, detailed, and educational
        - Content should be appropriate for students

        Your prompt should be short and concise, accurate.
        It should be in the style of a vr lab experiments.
        Return ONLY the prompt text, nothing else.
        "#
    )
}

/// Prompt for the text description returned when image generation fails.
pub fn fallback_description_prompt(prompt: &str) -> String {
    format!(
        "I couldn't generate an image for '{}', but here's a description of what it might look like:",
        prompt
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_quotes_experiment_details() {
        let instruction = image_prompt_instruction("Measure the pH of vinegar");
        assert!(instruction.contains("\"Measure the pH of vinegar\""));
        assert!(instruction.contains("Return ONLY the prompt text, nothing else."));
    }

    #[test]
    fn fallback_prompt_embeds_user_prompt() {
        assert_eq!(
            fallback_description_prompt("a bunsen burner"),
            "I couldn't generate an image for 'a bunsen burner', but here's a description of what it might look like:"
        );
    }
}
