// Lookup of a similar command for a mistyped command name.
use strsim::normalized_damerau_levenshtein;

use crate::handler::context::CommandInfo;

// Returns names and aliases of all commands visible to users.
pub fn collect_candidates(commands: &[CommandInfo]) -> Vec<String> {
    commands
        .iter()
        .filter(|command| !command.hidden)
        .flat_map(|command| {
            std::iter::once(command.name.clone()).chain(command.aliases.iter().cloned())
        })
        .collect()
}

// Returns the candidate closest to `name`, however weak the match is. None
// only for an empty list. On equal scores the earlier candidate wins.
pub fn closest_match(name: &str, candidates: &[String]) -> Option<String> {
    let mut best: Option<(&String, f64)> = None;

    for candidate in candidates {
        let score = normalized_damerau_levenshtein(name, candidate);
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(candidate, _)| candidate.clone())
}

// Rewrites the original message with the suggested command name.
pub fn suggest_content(content: &str, misspelled: &str, suggestion: &str) -> String {
    content.replacen(misspelled, suggestion, 1)
}
