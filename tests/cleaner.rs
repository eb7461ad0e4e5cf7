use monoclean::error::Error;
use monoclean::filtering::{CascadeOptions, Mode, RuleCascade};
use monoclean::identifiers::{LangIdStage, LanguageIdentifier};
use monoclean::lm::{LanguageModel, LmType};
use monoclean::pipelines::{Cleaner, CleanerOptions, RunSummary, Scoring};
use monoclean::preprocess::TextPreprocessor;
use monoclean::scoring::{CalibrationStats, FluencyScorer, LmScorer};

/// French if the sentence says bonjour, English otherwise.
struct Bonjour;

impl LanguageIdentifier for Bonjour {
    fn identify(&self, sentence: &str) -> Result<Option<String>, Error> {
        if sentence.contains("bonjour") {
            Ok(Some("fr".to_string()))
        } else {
            Ok(Some("en".to_string()))
        }
    }
}

/// Every token costs -1.
struct Flat;

impl LanguageModel for Flat {
    fn score(&self, tokens: &[String]) -> f32 {
        -(tokens.len() as f32) - 1.0
    }
}

fn fluency() -> Scoring {
    let preprocessor = TextPreprocessor::new("en", LmType::Character, None).unwrap();
    Scoring::Fluency(FluencyScorer::new(
        LmScorer::new(preprocessor, Box::new(Flat)),
        CalibrationStats::new(-0.5, 0.2, -2.0, 0.5),
    ))
}

fn cleaner(mode: Mode, scoring: Scoring, options: CleanerOptions) -> Cleaner {
    let cascade = RuleCascade::new(&CascadeOptions {
        language: "en".to_string(),
        disable_minimal_length: false,
        mode,
    })
    .unwrap();
    let langid = LangIdStage::new(Box::new(Bonjour), "en", true, false);
    Cleaner::new(cascade, Some(langid), scoring, options).unwrap()
}

fn run(cleaner: &Cleaner, input: &str) -> (Vec<String>, RunSummary) {
    let mut out = Vec::new();
    let summary = cleaner.run(input.as_bytes(), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    (out.lines().map(String::from).collect(), summary)
}

const INPUT: &str = "The cat sat on the mat.
Hello
Bonjour tout le monde ici.
";

#[test]
fn score_annotated() {
    let options = CleanerOptions {
        annotated_output: true,
        ..Default::default()
    };
    let c = cleaner(Mode::ShortCircuit, fluency(), options);
    let (lines, summary) = run(&c, INPUT);

    assert_eq!(
        lines,
        vec![
            "The cat sat on the mat.\t0.632\tkeep",
            "Hello\t0\tno_titles",
            "Bonjour tout le monde ici.\t0\tno_wrong_language",
        ]
    );
    assert_eq!(summary.lines, 3);
    assert_eq!(summary.written, 3);
    assert_eq!(summary.skipped, 0);
}

#[test]
fn accumulate_with_lang_ident() {
    let options = CleanerOptions {
        annotated_output: true,
        add_lang_ident: true,
        score_only: true,
        ..Default::default()
    };
    let c = cleaner(Mode::Accumulate, fluency(), options);
    let (lines, _) = run(&c, "Hello\nbonjour hi\n");

    assert_eq!(
        lines,
        vec![
            "en\t0\tno_titles+not_too_short",
            "fr\t0\tnot_too_short+no_wrong_language",
        ]
    );
}

#[test]
fn accumulate_always_identifies_language() {
    let options = CleanerOptions {
        annotated_output: true,
        score_only: true,
        ..Default::default()
    };
    let c = cleaner(Mode::Accumulate, fluency(), options);
    let (lines, _) = run(&c, "bonjour hi\nThe cat sat on the mat.\n");

    assert_eq!(
        lines,
        vec!["0\tnot_too_short+no_wrong_language", "0.632\tkeep"]
    );
}

#[test]
fn short_circuit_does_not_append_language() {
    let options = CleanerOptions {
        annotated_output: true,
        add_lang_ident: true,
        ..Default::default()
    };
    let c = cleaner(Mode::ShortCircuit, fluency(), options);
    let (lines, _) = run(&c, "bonjour hi\n");
    assert_eq!(lines, vec!["bonjour hi\tfr\t0\tnot_too_short"]);
}

#[test]
fn disable_hardrules() {
    let options = CleanerOptions {
        annotated_output: true,
        disable_hardrules: true,
        ..Default::default()
    };
    let c = cleaner(Mode::ShortCircuit, fluency(), options);
    let (lines, _) = run(&c, INPUT);

    assert_eq!(
        lines,
        vec![
            "The cat sat on the mat.\t0.632\tkeep",
            "Hello\t0.632\tkeep",
            "Bonjour tout le monde ici.\t0.632\tkeep",
        ]
    );
}

#[test]
fn binary_scores() {
    let c = cleaner(Mode::ShortCircuit, Scoring::Binary, CleanerOptions::default());
    let (lines, _) = run(&c, INPUT);
    assert_eq!(
        lines,
        vec![
            "The cat sat on the mat.\t1",
            "Hello\t0",
            "Bonjour tout le monde ici.\t0",
        ]
    );
}

#[test]
fn sentence_column() {
    let options = CleanerOptions {
        scol: 2,
        score_only: true,
        ..Default::default()
    };
    let c = cleaner(Mode::ShortCircuit, Scoring::Binary, options);
    let input = "id1\tThe cat sat on the mat.
id2
id3\tHello\textra
";
    let (lines, summary) = run(&c, input);

    assert_eq!(lines, vec!["1", "0"]);
    assert_eq!(summary.lines, 3);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.written, summary.lines - summary.skipped);
}

#[test]
fn order_is_kept() {
    let options = CleanerOptions {
        batch_size: 4,
        ..Default::default()
    };
    let c = cleaner(Mode::ShortCircuit, Scoring::Binary, options);
    let input: String = (0..50)
        .map(|i| format!("This is sentence number {i} here.\n"))
        .collect();
    let (lines, summary) = run(&c, &input);

    assert_eq!(summary.written, 50);
    for (i, line) in lines.iter().enumerate() {
        assert!(
            line.starts_with(&format!("This is sentence number {i} here.\t")),
            "{line}"
        );
    }
}

#[test]
fn invalid_options() {
    let cascade = RuleCascade::new(&CascadeOptions::default()).unwrap();
    let options = CleanerOptions {
        scol: 0,
        ..Default::default()
    };
    assert!(Cleaner::new(cascade, None, Scoring::Binary, options).is_err());
}
