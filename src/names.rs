//! Loose team-name matching.
//!
//! User input like "san jose state" or "Hawaii" has to find "San José State"
//! and "Hawai'i" in the cache, so matching strips accents on the letters that
//! actually occur in school names, plus case, whitespace and punctuation.

/// Canonical lookup form of a team name.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter_map(fold_char)
        .collect()
}

fn fold_char(c: char) -> Option<char> {
    let folded = match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        c if c.is_whitespace() => return None,
        '\'' | '’' | '-' | '.' | '(' | ')' | '&' => return None,
        c => c,
    };
    Some(folded.to_ascii_lowercase())
}

/// Resolve user input to a canonical name from the given universe.
pub fn resolve<'a, I>(input: &str, universe: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let wanted = normalize(input);
    universe
        .into_iter()
        .find(|name| normalize(name) == wanted)
        .map(|name| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_case_space_and_punctuation() {
        assert_eq!(normalize("Texas A&M"), "texasam");
        assert_eq!(normalize("Miami (OH)"), "miamioh");
        assert_eq!(normalize("hawai'i"), "hawaii");
    }

    #[test]
    fn folds_accents() {
        assert_eq!(normalize("San José State"), "sanjosestate");
        assert_eq!(normalize("san jose state"), "sanjosestate");
    }

    #[test]
    fn resolves_against_universe() {
        let teams = ["San José State", "Oregon State", "Texas A&M"];
        assert_eq!(
            resolve("san jose state", teams),
            Some("San José State".to_string())
        );
        assert_eq!(resolve("texas a&m", teams), Some("Texas A&M".to_string()));
        assert_eq!(resolve("Nowhere U", teams), None);
    }
}
