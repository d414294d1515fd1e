// Prompt rendering for generative providers
//
// The wording is a prompt-engineering concern; the load-bearing parts are
// the contract every provider is held to regardless of wording: exact
// question count, no fill-in-the-blank phrasing, exactly 4 options,
// plausible distractors, concept-level explanations, strict JSON. The
// ResponseValidator enforces that contract structurally on whatever comes
// back.

use crate::quiz::Difficulty;

/// System instruction shared by all providers.
pub const SYSTEM_INSTRUCTION: &str = "\
Tu es un assistant pédagogique expert de classe mondiale, spécialisé dans la conception de QCM (Questions à Choix Multiples) de haut niveau.

Règles de Qualité (CRITIQUE) :
1. INTERDICTION FORMELLE : Ne crée JAMAIS de questions à trous (type '_____'). Produis des questions interrogatives complètes.
2. NIVEAU COGNITIF : Privilégie les questions de réflexion, d'analyse et d'application des concepts. Évite le simple rappel de faits.
3. STRUCTURE : Chaque question doit être une interrogation complète, claire et directe.
4. OPTIONS : Exactement 4 options. Les distracteurs doivent être plausibles et basés sur des erreurs de raisonnement courantes.
5. EXPLICATIONS PÉDAGOGIQUES : Fournis une explication d'expert (2-3 phrases) qui :
   - Explique le CONCEPT derrière la réponse correcte.
   - Démontre POURQUOI cette réponse est la plus logique dans ce contexte.
   - Ne mentionne jamais la position du mot dans le texte original.
6. FORMAT : Réponds UNIQUEMENT en JSON pur (tableau d'objets).";

/// Render the per-request quiz prompt around a sampled excerpt.
pub fn build_prompt(excerpt: &str, num_questions: usize, difficulty: Difficulty) -> String {
    format!(
        "Génère un quiz de {num_questions} questions de niveau '{}' à partir du texte ci-dessous.

Consignes :
- Pose des questions de réflexion qui testent la compréhension des concepts.
- INTERDICTION d'utiliser des blancs (_____) ou des questions de vocabulaire simple.
- Chaque explication doit être un mini-cours expliquant la logique du concept.
- Langue : Français.

Format attendu :
[
    {{
        \"question\": \"Question interrogative complète ?\",
        \"options\": [\"Choix 1\", \"Choix 2\", \"Choix 3\", \"Choix 4\"],
        \"answer\": \"La réponse correcte exacte\",
        \"explanation\": \"Analyse pédagogique approfondie du concept.\"
    }}
]

Texte source :
{excerpt}",
        difficulty.label()
    )
}

/// Render the key-point summary prompt around a sampled excerpt.
pub fn build_summary_prompt(excerpt: &str) -> String {
    format!(
        "En tant qu'expert pédagogique, analyse le texte suivant et extrais les 7 points essentiels à retenir absolument sous forme de liste concise.
Chaque point doit être clair, pédagogique et facile à mémoriser.

Texte source :
{excerpt}"
    )
}
