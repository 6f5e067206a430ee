use crate::error::{Result, ScaffoldError};
use crate::services::{ActivityLogger, Config};
use crate::tools::artifact::TranslatorArtifact;
use crate::tools::batch::batch_ordered;
use crate::tools::compare::evaluate;
use crate::tools::extract::extract_test_cases;
use crate::tools::server::{HttpTranslationServer, TranslationServer};
use crate::types::*;
use std::time::Instant;

/* ------------ public facade components ------------ */

pub struct Components {
    pub server: Box<dyn TranslationServer>,
    pub config: Config,
    /// `None` disables the activity log.
    pub logger: Option<ActivityLogger>,
}

impl Components {
    /// HTTP server client and activity log as described by `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let server =
            HttpTranslationServer::new(&config.server_url, &config.channel, config.timeout_ms)?;
        Ok(Self {
            server: Box::new(server),
            config,
            // Logging is best effort; no home dir means no log.
            logger: ActivityLogger::new().ok(),
        })
    }

    pub fn with_server(server: Box<dyn TranslationServer>, config: Config) -> Self {
        Self {
            server,
            config,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: ActivityLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    // Logging errors never break the main operation.
    fn log_info(&self, scope: Option<&str>, event: &str, details: &str) {
        if let Some(logger) = &self.logger {
            let _ = logger.info(scope, event, Some(details));
        }
    }

    fn log_error(&self, scope: Option<&str>, event: &str, details: &str) {
        if let Some(logger) = &self.logger {
            let _ = logger.error(scope, event, Some(details));
        }
    }

    fn release(&self, artifact: TranslatorArtifact) {
        if let Err(e) = artifact.release() {
            self.log_error(None, "release_translator", &e.to_string());
        }
    }
}

/* ------------ run / test entrypoints ------------ */

/// Run `script` against a single URL and return the server's reply verbatim.
pub async fn run_translator(
    components: &Components,
    script: &str,
    test_url: &str,
) -> Result<RunResult> {
    let start_time = Instant::now();
    if script.trim().is_empty() || test_url.trim().is_empty() {
        return Err(ScaffoldError::InvalidInput(
            "missing translator code or test url".into(),
        ));
    }

    let artifact = TranslatorArtifact::create(&components.config.translators_dir, script)?;
    let result = components.server.translate_raw(test_url).await;
    components.release(artifact);

    let duration = start_time.elapsed();
    match &result {
        Ok(_) => components.log_info(
            Some(test_url),
            "run_translator",
            &format!("succeeded in {}ms", duration.as_millis()),
        ),
        Err(e) => components.log_error(
            Some(test_url),
            "run_translator",
            &format!("failed in {}ms: {e}", duration.as_millis()),
        ),
    }

    result.map(|result| RunResult { result })
}

/// Run every test case embedded in `script`.
///
/// A script whose test cases cannot be extracted fails as a whole. After
/// that, each case stands alone: a failed call becomes an `Unknown error`
/// result and the remaining cases still run.
pub async fn test_translator(components: &Components, script: &str) -> Result<TestReport> {
    let cases = match extract_test_cases(script) {
        Ok(cases) => cases,
        Err(e) => {
            components.log_error(None, "test_translator", &e.to_string());
            return Err(e);
        }
    };
    test_cases(components, script, &cases).await
}

/// Run an explicit list of test cases against `script`.
pub async fn test_cases(
    components: &Components,
    script: &str,
    cases: &[TestCase],
) -> Result<TestReport> {
    let start_time = Instant::now();
    if script.trim().is_empty() {
        return Err(ScaffoldError::InvalidInput("missing translator code".into()));
    }

    let artifact = TranslatorArtifact::create(&components.config.translators_dir, script)?;
    let results = batch_ordered(
        cases.iter().collect(),
        components.config.concurrency,
        |case| run_case(components, case),
    )
    .await;
    components.release(artifact);

    let report = TestReport { cases: results };
    components.log_info(
        None,
        "test_translator",
        &format!(
            "{}/{} passed in {}ms",
            report.passed(),
            report.cases.len(),
            start_time.elapsed().as_millis()
        ),
    );
    Ok(report)
}

async fn run_case(components: &Components, case: &TestCase) -> TestCaseResult {
    match components.server.translate(&case.url).await {
        Ok(raw) => evaluate(case, &raw, components.config.match_mode),
        Err(e) => {
            components.log_error(Some(&case.url), "test_case", &e.to_string());
            TestCaseResult::unknown_error(&case.url)
        }
    }
}
