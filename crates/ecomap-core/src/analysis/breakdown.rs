use std::collections::HashMap;

use crate::analysis::outcome::Tally;

const ELLIPSIS: &str = "...";

/// Split a free-text residue field into trimmed, non-empty descriptors.
///
/// Commas and semicolons are both accepted as separators.
pub fn split_residues(text: &str) -> Vec<&str> {
    text.split([',', ';'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Shorten a label to at most `max_chars` characters, marking the cut with `...`.
///
/// Counts characters, not bytes, so accented descriptors are never split
/// inside a code point.
pub fn shorten_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut short: String = label.chars().take(keep).collect();
    short.push_str(ELLIPSIS);
    short
}

/// Count occurrences and keep the `limit` most frequent.
///
/// Ties keep the order in which the names were first seen.
pub fn tally_top<I>(names: I, limit: usize) -> Vec<Tally>
where
    I: IntoIterator<Item = String>,
{
    let mut tallies: Vec<Tally> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for name in names {
        match index.get(&name) {
            Some(&i) => tallies[i].count += 1,
            None => {
                index.insert(name.clone(), tallies.len());
                tallies.push(Tally { name, count: 1 });
            }
        }
    }

    // sort_by is stable: equal counts stay in first-seen order
    tallies.sort_by(|a, b| b.count.cmp(&a.count));
    tallies.truncate(limit);
    tallies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mixed_delimiters() {
        assert_eq!(
            split_residues("Lodos; Chatarra , Aceites usados"),
            vec!["Lodos", "Chatarra", "Aceites usados"]
        );
    }

    #[test]
    fn test_split_trailing_delimiters() {
        assert_eq!(split_residues("Lodos,;"), vec!["Lodos"]);
        assert_eq!(split_residues(";,Lodos"), vec!["Lodos"]);
    }

    #[test]
    fn test_split_whitespace_only_tokens_dropped() {
        assert_eq!(split_residues("Lodos,   ;\t, Papel"), vec!["Lodos", "Papel"]);
        assert!(split_residues("   ").is_empty());
        assert!(split_residues("").is_empty());
    }

    #[test]
    fn test_shorten_keeps_short_labels() {
        assert_eq!(shorten_label("Lodos", 40), "Lodos");
        let exact = "a".repeat(40);
        assert_eq!(shorten_label(&exact, 40), exact);
    }

    #[test]
    fn test_shorten_long_label() {
        let long = "x".repeat(41);
        let short = shorten_label(&long, 40);
        assert_eq!(short.chars().count(), 40);
        assert!(short.ends_with("..."));
        assert_eq!(&short[..37], &long[..37]);
    }

    #[test]
    fn test_shorten_counts_characters_not_bytes() {
        let long = "ñ".repeat(45);
        let short = shorten_label(&long, 40);
        assert_eq!(short, format!("{}...", "ñ".repeat(37)));
    }

    #[test]
    fn test_tally_sorted_descending() {
        let names = ["A", "B", "A"].iter().map(|s| s.to_string());
        let t = tally_top(names, 5);
        assert_eq!(
            t,
            vec![
                Tally { name: "A".into(), count: 2 },
                Tally { name: "B".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_tally_ties_keep_first_seen_order_and_limit() {
        let names = ["C", "B", "A", "D", "E", "F", "B"]
            .iter()
            .map(|s| s.to_string());
        let t = tally_top(names, 3);
        let order: Vec<&str> = t.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }
}
