//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use monoclean::filtering::{CascadeOptions, Mode};
use monoclean::lm::estimate::EstimateParams;
use monoclean::lm::LmType;
use monoclean::pipelines::CleanerOptions;
use monoclean::training::TrainOptions;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "monoclean",
    about = "sentence filtering and fluency scoring for monolingual corpora."
)]
/// Holds every command that is callable by the `monoclean` command.
pub enum Monoclean {
    #[structopt(
        about = "Score sentences with hard rules, language identification and a fluency model"
    )]
    Score(Score),
    #[structopt(
        about = "Apply hard rules and language identification only (1 = keep, 0 = discard)"
    )]
    Hardrules(Hardrules),
    #[structopt(about = "Train a fluency model")]
    Train(Train),
}

impl Monoclean {
    pub fn verbosity(&self) -> &Verbosity {
        match self {
            Monoclean::Score(s) => &s.verbosity,
            Monoclean::Hardrules(h) => &h.verbosity,
            Monoclean::Train(t) => &t.verbosity,
        }
    }
}

#[derive(Debug, StructOpt)]
pub struct Verbosity {
    #[structopt(long = "debug", help = "debug logging")]
    pub debug: bool,
    #[structopt(short = "q", long = "quiet", help = "only log warnings and errors")]
    pub quiet: bool,
}

impl Verbosity {
    /// Default log filter, overridden by `RUST_LOG`.
    pub fn level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

fn parse_positive(src: &str) -> Result<usize, String> {
    match src.parse::<usize>() {
        Ok(0) => Err("must be positive".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Flags shared by `score` and `hardrules`.
#[derive(Debug, StructOpt)]
pub struct Filtering {
    #[structopt(
        long = "scol",
        default_value = "1",
        parse(try_from_str = parse_positive),
        help = "Sentence column (starting in 1)"
    )]
    pub scol: usize,
    #[structopt(long = "disable-lang-ident", help = "Disable language identification")]
    pub disable_lang_ident: bool,
    #[structopt(
        long = "disable-minimal-length",
        help = "Don't apply minimal length (3 words) rule"
    )]
    pub disable_minimal_length: bool,
    #[structopt(long = "disable-hbs", help = "Don't group Serbo-Croatian under 'hbs' tag")]
    pub disable_hbs: bool,
    #[structopt(
        long = "detect-script",
        help = "Add writing script to identified language (only Serbo-Croatian is supported)"
    )]
    pub detect_script: bool,
    #[structopt(
        long = "score-only",
        help = "Only print the score for each sentence, omit all fields"
    )]
    pub score_only: bool,
    #[structopt(
        long = "add-lang-ident",
        help = "Add a column with the identified language if it's not disabled"
    )]
    pub add_lang_ident: bool,
    #[structopt(long = "annotated-output", help = "Add hard rules annotation for each sentence")]
    pub annotated_output: bool,
    #[structopt(
        long = "run-all-rules",
        help = "Run all hard rules for each sentence instead of stopping at the first failing one"
    )]
    pub run_all_rules: bool,
    #[structopt(
        parse(from_os_str),
        long = "lid-path",
        help = "Path to lid.176.bin",
        default_value = "lid.176.bin"
    )]
    pub lid_path: PathBuf,
    #[structopt(
        long = "batch-size",
        default_value = "10000",
        parse(try_from_str = parse_positive),
        help = "Number of lines processed in parallel at once"
    )]
    pub batch_size: usize,
}

impl Filtering {
    pub fn cascade_options(&self, language: &str) -> CascadeOptions {
        CascadeOptions {
            language: language.to_string(),
            disable_minimal_length: self.disable_minimal_length,
            mode: if self.run_all_rules {
                Mode::Accumulate
            } else {
                Mode::ShortCircuit
            },
        }
    }

    pub fn cleaner_options(&self, disable_hardrules: bool) -> CleanerOptions {
        CleanerOptions {
            scol: self.scol,
            disable_hardrules,
            score_only: self.score_only,
            add_lang_ident: self.add_lang_ident && !self.disable_lang_ident,
            annotated_output: self.annotated_output,
            batch_size: self.batch_size,
        }
    }
}

#[derive(Debug, StructOpt)]
/// Score command and parameters.
pub struct Score {
    #[structopt(parse(from_os_str), help = "Model directory (metadata.yaml and language model)")]
    pub model_dir: PathBuf,
    #[structopt(parse(from_os_str), help = "Input file. If omitted, read from stdin")]
    pub input: Option<PathBuf>,
    #[structopt(
        parse(from_os_str),
        help = "Output tab-separated file. If omitted, write to stdout"
    )]
    pub output: Option<PathBuf>,
    #[structopt(
        long = "disable-hardrules",
        help = "Disable hard rules (only fluency scoring is applied)"
    )]
    pub disable_hardrules: bool,
    #[structopt(flatten)]
    pub filtering: Filtering,
    #[structopt(flatten)]
    pub verbosity: Verbosity,
}

#[derive(Debug, StructOpt)]
/// Hardrules command and parameters.
pub struct Hardrules {
    #[structopt(help = "Language code of the corpus (ISO 639-1)")]
    pub language: String,
    #[structopt(parse(from_os_str), help = "Input file. If omitted, read from stdin")]
    pub input: Option<PathBuf>,
    #[structopt(
        parse(from_os_str),
        help = "Output tab-separated file. If omitted, write to stdout"
    )]
    pub output: Option<PathBuf>,
    #[structopt(flatten)]
    pub filtering: Filtering,
    #[structopt(flatten)]
    pub verbosity: Verbosity,
}

#[derive(Debug, StructOpt)]
/// Train command and parameters.
pub struct Train {
    #[structopt(
        parse(from_os_str),
        help = "Training corpus, one sentence per line"
    )]
    pub corpus: PathBuf,
    #[structopt(
        parse(from_os_str),
        help = "Model directory to store the language model and metadata"
    )]
    pub model_dir: PathBuf,
    #[structopt(short = "l", long = "language", help = "Language code of the model")]
    pub language: String,
    #[structopt(
        long = "dev-size",
        default_value = "4000",
        help = "Number of sentences held out to calibrate scores"
    )]
    pub dev_size: usize,
    #[structopt(
        long = "lm-type",
        default_value = "CHARACTER",
        possible_values = &LmType::VARIANTS,
        case_insensitive = true,
        help = "Language model type"
    )]
    pub lm_type: LmType,
    #[structopt(
        long = "tokenizer-command",
        help = "Tokenizer command for PLACEHOLDER models (default: Unicode word boundaries)"
    )]
    pub tokenizer_command: Option<String>,
    #[structopt(
        long = "order",
        default_value = "7",
        parse(try_from_str = parse_positive),
        help = "n-gram order"
    )]
    pub order: usize,
    #[structopt(long = "seed", help = "Shuffling seed. Random if omitted")]
    pub seed: Option<u64>,
    #[structopt(
        parse(from_os_str),
        long = "tmp-dir",
        help = "Directory for intermediate files. System temp dir if omitted"
    )]
    pub tmp_dir: Option<PathBuf>,
    #[structopt(flatten)]
    pub verbosity: Verbosity,
}

impl Train {
    pub fn train_options(&self) -> TrainOptions {
        let mut options = TrainOptions::new(self.language.clone());
        options.lm_type = self.lm_type;
        options.tokenizer_command = self.tokenizer_command.clone();
        options.dev_size = self.dev_size;
        options.estimate = EstimateParams {
            order: self.order,
            ..Default::default()
        };
        if let Some(seed) = self.seed {
            options.seed = seed;
        }
        options.tmp_dir = self.tmp_dir.clone();
        options
    }
}
