use folio_chat::kernel::event::Language;
use folio_chat::kernel::intent::rules::{QUICK_ABOUT_EN, QUICK_QUESTION_EN};
use folio_chat::kernel::intent::types::{MatchKind, RuleMatch};
use folio_chat::kernel::intent::IntentResolver;
use folio_chat::kernel::paragraph::{segment, wrap_paragraph, PARAGRAPH_BREAK};
use proptest::prelude::*;

fn language() -> impl Strategy<Value = Language> {
    prop_oneof![Just(Language::En), Just(Language::Cn)]
}

proptest! {
    #[test]
    fn resolve_is_deterministic(text in ".{0,80}", lang in language()) {
        let resolver = IntentResolver::new();
        prop_assert_eq!(resolver.resolve(&text, lang), resolver.resolve(&text, lang));
    }

    #[test]
    fn resolve_is_total(text in ".{0,80}", lang in language()) {
        let resolver = IntentResolver::new();
        let reply = resolver.resolve(&text, lang);
        prop_assert!(!reply.body.is_empty());
        prop_assert!(!segment(&reply.body).is_empty());
    }

    #[test]
    fn quick_replies_win_whatever_else_is_in_the_table(suffix in "[a-z]{0,3}") {
        // Appending text breaks exactness; the bare phrase never does.
        let resolver = IntentResolver::new();
        for phrase in [QUICK_QUESTION_EN, QUICK_ABOUT_EN] {
            let exact = resolver.resolve_detailed(phrase, Language::En);
            let is_exact = matches!(exact.matched, RuleMatch::Rule { kind: MatchKind::Exact, .. });
            prop_assert!(is_exact);

            if !suffix.is_empty() {
                let padded = format!("{phrase}{suffix}");
                let loose = resolver.resolve_detailed(&padded, Language::En);
                let is_exact = matches!(loose.matched, RuleMatch::Rule { kind: MatchKind::Exact, .. });
                prop_assert!(!is_exact);
            }
        }
    }

    #[test]
    fn double_break_round_trip(pieces in prop::collection::vec("[a-z .!]{0,12}", 1..6)) {
        let body = pieces.join(PARAGRAPH_BREAK);
        let paragraphs = segment(&body);

        prop_assert_eq!(paragraphs.len(), pieces.len());
        let rebuilt: Vec<&str> = paragraphs.iter().map(|p| p.html.as_str()).collect();
        prop_assert_eq!(rebuilt.join(PARAGRAPH_BREAK), body);
    }

    #[test]
    fn tag_round_trip(pieces in prop::collection::vec("[a-z .!\n]{0,12}", 1..6)) {
        let body: String = pieces.iter().map(|p| wrap_paragraph(p)).collect();
        let paragraphs = segment(&body);

        prop_assert_eq!(paragraphs.len(), pieces.len());
        let text: String = paragraphs.iter().map(|p| p.html.as_str()).collect();
        prop_assert_eq!(text, pieces.concat());
    }

    #[test]
    fn plain_text_is_a_single_paragraph(body in "[a-z .!]{0,40}") {
        let paragraphs = segment(&body);
        prop_assert_eq!(paragraphs.len(), 1);
        prop_assert_eq!(&paragraphs[0].html, &body);
    }
}
