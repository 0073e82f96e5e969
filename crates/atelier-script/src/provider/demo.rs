/// Canned three-scene script built around the prompt
pub(crate) fn script(prompt: &str) -> String {
    let idea = prompt.trim();

    format!(
        "Title: {idea}\n\
         \n\
         Scene 1 - Opening\n\
         Visual: A wide establishing shot that sets the mood.\n\
         Narrator: Today we explore {idea}.\n\
         \n\
         Scene 2 - The heart of it\n\
         Visual: Close-ups and details that bring the idea to life.\n\
         Narrator: Look closer and {idea} reveals more than you expect.\n\
         \n\
         Scene 3 - Closing\n\
         Visual: A slow pull back to the full picture.\n\
         Narrator: And that is {idea}. Thanks for watching."
    )
}
