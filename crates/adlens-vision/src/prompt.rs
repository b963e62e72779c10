// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt construction for critique and comparison requests.

use crate::types::BrandContext;

/// Build the critique prompt, weaving in any user-supplied brand context.
pub fn critique_prompt(context: Option<&BrandContext>) -> String {
    let context_block = match context {
        Some(ctx) => format!(
            "\nAdditional context provided by the user:\n\
             - Target platform: {}\n\
             - Brand colors: {}\n\
             - Brand fonts: {}\n\
             - User description/goals: {}\n",
            ctx.platform.as_deref().unwrap_or("General"),
            ctx.colors.as_deref().unwrap_or("Not specified"),
            ctx.fonts.as_deref().unwrap_or("Not specified"),
            ctx.description.as_deref().unwrap_or("Not specified"),
        ),
        None => String::new(),
    };

    format!(
        "You are a world-class visual marketing expert. Analyze this image for marketing effectiveness.\n\
         Target audience: general social media users (Instagram/TikTok/LinkedIn).\n\
         {context_block}\n\
         Provide a structured analysis in JSON format with the following fields:\n\
         - score: a number between 0-100 representing overall marketing impact.\n\
         - summary: a concise 2-sentence summary of the visual's effectiveness.\n\
         - strengths: array of 3 key strengths.\n\
         - weaknesses: array of 3 key weaknesses.\n\
         - recommendations: array of objects with {{ category: 'style'|'content'|'structure'|'color', suggestion: string, impact: 'high'|'medium'|'low' }}.\n\
         - platformSpecifics: object with {{ platform: 'instagram'|'tiktok'|'youtube'|'linkedin'|'facebook', tips: string[] }} (choose the most relevant platform based on user context or image content).\n\
         \n\
         Focus on:\n\
         - Visual hierarchy and clarity\n\
         - Color psychology and branding (compare with provided brand colors if any)\n\
         - Text readability and hook (if any)\n\
         - Emotional appeal and engagement potential\n\
         - Alignment with user goals (if provided)\n"
    )
}

/// Build the A/B comparison prompt.
pub fn compare_prompt() -> String {
    "You are a world-class marketing expert specializing in A/B testing and conversion rate optimization.\n\
     \n\
     Analyze these two marketing visuals (Image A and Image B).\n\
     Your goal is to predict which one will perform better (higher CTR, better conversion, more engagement).\n\
     \n\
     Compare them on:\n\
     1. Visual hierarchy & clarity\n\
     2. Emotional impact\n\
     3. Call to action (if any) or focal point\n\
     4. Professionalism & aesthetics\n\
     \n\
     Return a JSON response with the following structure:\n\
     {\n\
       \"winner\": \"A\" or \"B\",\n\
       \"scoreA\": number (0-100),\n\
       \"scoreB\": number (0-100),\n\
       \"reasoning\": \"a concise explanation of why the winner is better (max 3 sentences)\",\n\
       \"keyDiffs\": [\"list of 3 key differences that make the winner better\"]\n\
     }\n\
     \n\
     Be decisive. Pick a winner.\n"
        .to_string()
}
