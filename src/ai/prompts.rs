/// Niche value meaning "no audience customization".
pub const DEFAULT_NICHE: &str = "default";

/// Number of hashtags requested per content plan.
pub const HASHTAG_COUNT: usize = 25;

/// System prompt for video content generation
pub fn video_system() -> String {
    "You are a social media strategist who writes metadata for short-form videos. \
     Always respond in valid JSON format as specified. Do not include markdown fences or explanations outside the JSON."
        .to_string()
}

/// True when `niche` asks for audience-specific wording.
pub fn has_niche(niche: &str) -> bool {
    let niche = niche.trim();
    !niche.is_empty() && niche != DEFAULT_NICHE
}

/// Ask for `option_count` content plans (title, description, hashtags) for `topic`.
pub fn video_content(topic: &str, niche: &str, option_count: usize) -> String {
    let option_count = option_count.max(1);
    let niche = niche.trim();
    let tailored = has_niche(niche);

    let niche_context = if tailored {
        format!(
            "The content should be specifically tailored for the {0} niche audience. \
             Use terminology, references, and examples that would resonate with {0} enthusiasts.\n",
            niche
        )
    } else {
        String::new()
    };

    let audience = if tailored {
        format!("{} enthusiasts", niche)
    } else {
        "a general audience".to_string()
    };
    let keywords_for = if tailored {
        format!("the {} niche", niche)
    } else {
        "this topic".to_string()
    };
    let visibility = if tailored {
        format!(" in the {} community", niche)
    } else {
        String::new()
    };

    let (intro, shape) = if option_count == 1 {
        (
            format!("Generate a creative content plan for the topic: \"{}\"", topic),
            "Format the response as a single JSON object with exactly these keys:".to_string(),
        )
    } else {
        (
            format!(
                "Generate {} distinct creative content plans for the topic: \"{}\"\n\
                 Each plan must take a different angle and style (for example tutorial, story, list, reaction), \
                 so no two titles or descriptions read alike.",
                option_count, topic
            ),
            format!(
                "Format the response as a JSON array of exactly {} objects, one per plan. \
                 Each object has exactly these keys:",
                option_count
            ),
        )
    };

    let per_plan = if option_count == 1 { "" } else { " for each plan" };

    format!(
        "{intro}\n\
         {niche_context}\n\
         Please provide{per_plan}:\n\
         1. An engaging title (maximum 60 characters) that would appeal to {audience}\n\
         2. A compelling description (150-200 words) that includes relevant keywords for {keywords_for}\n\
         3. {count} trending hashtags related to this topic that could help the video gain visibility{visibility}\n\n\
         {shape}\n\
         - title (string)\n\
         - description (string)\n\
         - hashtags (array of exactly {count} strings, each without the # symbol)\n\n\
         Make sure the hashtags are relevant, trending, and would help the video reach its target audience.",
        intro = intro,
        niche_context = niche_context,
        per_plan = per_plan,
        audience = audience,
        keywords_for = keywords_for,
        count = HASHTAG_COUNT,
        visibility = visibility,
        shape = shape,
    )
}
