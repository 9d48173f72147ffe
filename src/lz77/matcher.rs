use super::tokens::LZ77Token;
use crate::CodecConfig;

/// Greedy sliding-window match finder
///
/// At each position the whole trailing window is searched for the longest
/// run matching the lookahead. Runs may overlap the lookahead (a source
/// that extends past the cursor), which is how long repeats of a short
/// pattern collapse into a single match.
pub struct MatchFinder {
    window_size: usize,
    min_match: usize,
    max_match: usize,
}

impl MatchFinder {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            window_size: config.window_size as usize,
            min_match: config.min_match as usize,
            max_match: config.max_match as usize,
        }
    }

    /// Tokenize `input` into literals and matches
    pub fn find_tokens(&self, input: &[u8]) -> Vec<LZ77Token> {
        let mut tokens = Vec::with_capacity(input.len() / 2 + 1);
        let mut i = 0;

        while i < input.len() {
            match self.longest_match(input, i) {
                Some((offset, length)) => {
                    tokens.push(LZ77Token::Match {
                        offset: offset as u32,
                        length: length as u16,
                        next_byte: input[i + length],
                    });
                    i += length + 1;
                }
                None => {
                    tokens.push(LZ77Token::Literal(input[i]));
                    i += 1;
                }
            }
        }

        tokens
    }

    /// Find the best `(offset, length)` starting at `pos`, if it qualifies
    ///
    /// Candidates are scanned nearest-first and only a strictly longer run
    /// replaces the best, so equal lengths resolve to the smallest offset.
    /// The length is capped one short of the input end so a match always
    /// has a next byte.
    fn longest_match(&self, input: &[u8], pos: usize) -> Option<(usize, usize)> {
        let limit = self.max_match.min(input.len() - pos - 1);
        if limit < self.min_match {
            return None;
        }

        let window_start = pos.saturating_sub(self.window_size);
        let lookahead = &input[pos..pos + limit];

        let mut best_length = 0;
        let mut best_offset = 0;

        for candidate in (window_start..pos).rev() {
            let length = lookahead
                .iter()
                .zip(&input[candidate..])
                .take_while(|(a, b)| a == b)
                .count();

            if length > best_length {
                best_length = length;
                best_offset = pos - candidate;
                if length == limit {
                    break;
                }
            }
        }

        (best_length >= self.min_match).then_some((best_offset, best_length))
    }
}

/// Tokenize `input` with the given configuration
pub fn find_tokens(input: &[u8], config: &CodecConfig) -> Vec<LZ77Token> {
    MatchFinder::new(config).find_tokens(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lz77::tokens::uncompressed_size;

    fn literals(data: &[u8]) -> Vec<LZ77Token> {
        data.iter().map(|&b| LZ77Token::Literal(b)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(find_tokens(b"", &CodecConfig::default()).is_empty());
    }

    #[test]
    fn test_repeated_pattern_produces_match() {
        let tokens = find_tokens(b"abcabcabc", &CodecConfig::default());
        assert_eq!(&tokens[..3], literals(b"abc").as_slice());
        // Overlapping source run covers "abcab", leaving "c" as the next byte
        assert_eq!(tokens[3], LZ77Token::Match { offset: 3, length: 5, next_byte: b'c' });
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_no_qualifying_run_gives_only_literals() {
        let tokens = find_tokens(b"abXcdXef", &CodecConfig::default());
        assert_eq!(tokens, literals(b"abXcdXef"));
    }

    #[test]
    fn test_match_never_consumes_final_byte() {
        // Without the cap the run would reach end-of-input with no next byte
        let tokens = find_tokens(b"abcdabcd", &CodecConfig::default());
        assert_eq!(tokens[4], LZ77Token::Match { offset: 4, length: 3, next_byte: b'd' });
        assert_eq!(uncompressed_size(&tokens), 8);
    }

    #[test]
    fn test_short_tail_degrades_to_literals() {
        // Only "ab" plus a next byte would fit after the first "abc"
        let tokens = find_tokens(b"abcab", &CodecConfig::default());
        assert_eq!(tokens, literals(b"abcab"));
    }

    #[test]
    fn test_window_boundary() {
        // "abc" repeats at distance 5; a window of 4 cannot see it
        let data = b"abcdXabcZ";
        let narrow = CodecConfig::default().with_window_size(4);
        assert_eq!(find_tokens(data, &narrow), literals(data));

        let wide = CodecConfig::default().with_window_size(5);
        let tokens = find_tokens(data, &wide);
        assert_eq!(tokens[5], LZ77Token::Match { offset: 5, length: 3, next_byte: b'Z' });
    }

    #[test]
    fn test_ties_prefer_nearest() {
        // "xyz" occurs at distances 8 and 4 from the third copy
        let tokens = find_tokens(b"xyz1xyz2xyz3", &CodecConfig::default());
        let matches: Vec<_> = tokens.iter().filter(|t| t.is_match()).collect();
        assert_eq!(matches.len(), 2);
        assert_eq!(*matches[1], LZ77Token::Match { offset: 4, length: 3, next_byte: b'3' });
    }

    #[test]
    fn test_max_match_cap() {
        let data = vec![b'a'; 1000];
        let config = CodecConfig::default();
        let tokens = find_tokens(&data, &config);

        for token in &tokens {
            if let LZ77Token::Match { length, offset, .. } = token {
                assert!(*length <= config.max_match);
                assert!(*length >= config.min_match);
                assert!(*offset >= 1 && *offset <= config.window_size);
            }
        }
        assert_eq!(uncompressed_size(&tokens), 1000);
        // 1 literal, then runs of 255 + next byte
        assert_eq!(tokens[1], LZ77Token::Match { offset: 1, length: 255, next_byte: b'a' });
    }

    #[test]
    fn test_min_match_respected() {
        let data = b"abcdabcdQ";
        let config = CodecConfig::default().with_min_match(5);
        assert_eq!(find_tokens(data, &config), literals(data));
    }
}
