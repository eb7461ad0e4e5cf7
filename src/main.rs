//! # monoclean
//!
//! Sentence-level filtering and fluency scoring of monolingual corpora.
//!
//! ```sh
//! USAGE:
//!     monoclean <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     hardrules    Apply hard rules and language identification only (1 = keep, 0 = discard)
//!     help         Prints this message or the help of the given subcommand(s)
//!     score        Score sentences with hard rules, language identification and a fluency model
//!     train        Train a fluency model
//! ```
use monoclean::error::Error;
use monoclean::filtering::RuleCascade;
use monoclean::identifiers::{FastText, LangIdStage};
use monoclean::lm::estimate::Lmplz;
use monoclean::metadata::Metadata;
use monoclean::pipelines::{Cleaner, CleanerPipeline, Pipeline, Scoring};
use monoclean::scoring::FluencyScorer;
use monoclean::training::Calibrator;
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod cli;

/// Build the language identification stage, unless disabled.
fn langid(filtering: &cli::Filtering, language: &str) -> Result<Option<LangIdStage>, Error> {
    if filtering.disable_lang_ident {
        return Ok(None);
    }
    let group_hbs = !filtering.disable_hbs;
    let identifier = FastText::new(&filtering.lid_path, group_hbs, filtering.detect_script)?;
    Ok(Some(LangIdStage::new(
        Box::new(identifier),
        language,
        group_hbs,
        filtering.detect_script,
    )))
}

fn score(s: cli::Score) -> Result<(), Error> {
    let metadata = Metadata::from_dir(&s.model_dir)?;
    debug!("model metadata\n{:#?}", metadata);

    let scorer = FluencyScorer::from_metadata(&s.model_dir, &metadata)?;
    let cascade = RuleCascade::new(&s.filtering.cascade_options(&metadata.language))?;
    let cleaner = Cleaner::new(
        cascade,
        langid(&s.filtering, &metadata.language)?,
        Scoring::Fluency(scorer),
        s.filtering.cleaner_options(s.disable_hardrules),
    )?;

    CleanerPipeline::new(s.input, s.output, cleaner).run()?;
    Ok(())
}

fn hardrules(h: cli::Hardrules) -> Result<(), Error> {
    let cascade = RuleCascade::new(&h.filtering.cascade_options(&h.language))?;
    let cleaner = Cleaner::new(
        cascade,
        langid(&h.filtering, &h.language)?,
        Scoring::Binary,
        h.filtering.cleaner_options(false),
    )?;

    CleanerPipeline::new(h.input, h.output, cleaner).run()?;
    Ok(())
}

fn train(t: cli::Train) -> Result<(), Error> {
    if !t.corpus.is_file() {
        return Err(Error::Config(format!(
            "training corpus {:?} does not exist",
            t.corpus
        )));
    }
    let calibrator = Calibrator::new(
        t.corpus.clone(),
        t.model_dir.clone(),
        t.train_options(),
        Lmplz::default(),
    );
    calibrator.run()?;
    Ok(())
}

fn main() -> Result<(), Error> {
    let opt = cli::Monoclean::from_args();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(opt.verbosity().level()),
    )
    .init();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Monoclean::Score(s) => score(s)?,
        cli::Monoclean::Hardrules(h) => hardrules(h)?,
        cli::Monoclean::Train(t) => train(t)?,
    };
    Ok(())
}
