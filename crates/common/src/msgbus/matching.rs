// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Topic matching for pub/sub subscriptions.
//!
//! A pattern ending in `*` is a prefix wildcard: it matches every topic that starts
//! with the pattern minus its `*`. Any other pattern only matches the identical topic.

/// The wildcard character terminating a prefix pattern.
pub const WILDCARD: char = '*';

/// Returns the prefix of a wildcard `pattern`, or `None` for an exact pattern.
#[must_use]
pub fn wildcard_prefix(pattern: &str) -> Option<&str> {
    pattern.strip_suffix(WILDCARD)
}

/// Returns `true` if `topic` is matched by `pattern`.
///
/// `"a.*"` matches `"a.b"` and `"a.b.c"` but not `"a"` or `"ab"`.
#[must_use]
pub fn is_matching(topic: &str, pattern: &str) -> bool {
    match wildcard_prefix(pattern) {
        Some(prefix) => topic.starts_with(prefix),
        None => topic == pattern,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("a.b", "a.*", true)]
    #[case("a.b.c", "a.*", true)]
    #[case("a.", "a.*", true)]
    #[case("a", "a.*", false)]
    #[case("ab", "a.*", false)]
    #[case("anything", "*", true)]
    #[case("market_data.quote", "market_data.quote", true)]
    #[case("market_data.quotes", "market_data.quote", false)]
    #[case("market_data", "market_data.quote", false)]
    fn test_is_matching(#[case] topic: &str, #[case] pattern: &str, #[case] expected: bool) {
        assert_eq!(is_matching(topic, pattern), expected);
    }

    #[rstest]
    #[case("order.*", Some("order."))]
    #[case("order.filled", None)]
    #[case("*", Some(""))]
    fn test_wildcard_prefix(#[case] pattern: &str, #[case] expected: Option<&str>) {
        assert_eq!(wildcard_prefix(pattern), expected);
    }

    proptest! {
        #[test]
        fn prop_wildcard_matches_iff_prefix(prefix in "[a-z._]{0,12}", topic in "[a-z._]{0,16}") {
            let pattern = format!("{prefix}*");
            prop_assert_eq!(is_matching(&topic, &pattern), topic.starts_with(&prefix));
        }

        #[test]
        fn prop_exact_matches_iff_equal(pattern in "[a-z._]{1,12}", topic in "[a-z._]{1,12}") {
            prop_assert_eq!(is_matching(&topic, &pattern), topic == pattern);
        }
    }
}
