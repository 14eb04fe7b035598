use chrono::Utc;
use std::sync::Arc;

use crate::models::{AnalyticsSummary, CheckRecord, FitCheckConfig, GradeResult, GradingInput};
use crate::services::{GradingError, GradingService, HistoryLog};

/// Orchestrates one grading attempt: validate, grade, record. Each attempt is
/// independent; no state crosses request boundaries. Cooperative single-flight
/// (disabling re-submission while a check runs) is the UI's responsibility.
pub struct CheckHandler {
    grader: Arc<dyn GradingService>,
    history: Arc<HistoryLog>,
}

impl CheckHandler {
    pub fn new(grader: Arc<dyn GradingService>, history: Arc<HistoryLog>) -> Self {
        Self { grader, history }
    }

    pub async fn check(
        &self,
        input: GradingInput,
        fit: Option<FitCheckConfig>,
    ) -> Result<GradeResult, GradingError> {
        validate_input(&input)?;

        log::info!(
            "🔍 CHECK - text: {:?} | image: {} | fit check: {}",
            input.text_value().map(|t| t.chars().take(80).collect::<String>()),
            input.image_data().is_some(),
            fit.as_ref().map_or(false, |f| f.include_fit_check)
        );

        let mut result = self.grader.grade(&input, fit.as_ref()).await?;
        result.timestamp = Some(Utc::now());

        log::info!("✅ Graded: {} (score {})", result.grade, result.score);
        self.history.record(&input, &result);

        Ok(result)
    }

    pub fn recent_checks(&self) -> Vec<CheckRecord> {
        self.history.recent()
    }

    pub fn analytics(&self) -> AnalyticsSummary {
        self.history.analytics()
    }
}

fn validate_input(input: &GradingInput) -> Result<(), GradingError> {
    let has_text = input.text_value().map_or(false, |t| !t.trim().is_empty());
    let has_image = input.image_data().map_or(false, |(bytes, _)| !bytes.is_empty());

    if has_text || has_image {
        Ok(())
    } else {
        Err(GradingError::EmptyInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grade;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGrader {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingGrader {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait::async_trait]
    impl GradingService for CountingGrader {
        async fn grade(
            &self,
            _input: &GradingInput,
            fit: Option<&FitCheckConfig>,
        ) -> Result<GradeResult, GradingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GradingError::Service("upstream down".to_string()));
            }
            Ok(GradeResult {
                product_name: Some("Test Shirt".to_string()),
                score: 92,
                grade: Grade::A,
                composition_analysis: "100% Linen".to_string(),
                care_instructions: None,
                explanation: "Natural fiber".to_string(),
                fit_verdict: fit.map(|f| format!("Size {} fits true", f.desired_size)),
                sources: vec![],
                timestamp: None,
            })
        }
    }

    #[tokio::test]
    async fn test_one_grade_call_per_check() {
        let grader = CountingGrader::new(false);
        let handler = CheckHandler::new(grader.clone(), Arc::new(HistoryLog::new()));

        let result = handler
            .check(GradingInput::text("Uniqlo Linen Shirt"), None)
            .await
            .unwrap();

        assert_eq!(grader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.score, 92);
        assert!(result.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_successful_check_is_recorded() {
        let handler = CheckHandler::new(CountingGrader::new(false), Arc::new(HistoryLog::new()));

        handler
            .check(GradingInput::text("hemp tote"), None)
            .await
            .unwrap();

        let recent = handler.recent_checks();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].input_text.as_deref(), Some("hemp tote"));
    }

    #[tokio::test]
    async fn test_failed_check_leaves_history_untouched() {
        let grader = CountingGrader::new(true);
        let handler = CheckHandler::new(grader.clone(), Arc::new(HistoryLog::new()));

        let err = handler
            .check(GradingInput::text("anything"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, GradingError::Service(_)));
        assert_eq!(grader.calls.load(Ordering::SeqCst), 1);
        assert!(handler.recent_checks().is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_rejected_before_any_call() {
        let grader = CountingGrader::new(false);
        let handler = CheckHandler::new(grader.clone(), Arc::new(HistoryLog::new()));

        let err = handler.check(GradingInput::text("   "), None).await.unwrap_err();
        assert!(matches!(err, GradingError::EmptyInput));
        assert_eq!(grader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fit_check_passes_through() {
        let handler = CheckHandler::new(CountingGrader::new(false), Arc::new(HistoryLog::new()));

        let fit = FitCheckConfig {
            include_fit_check: true,
            desired_size: "M".to_string(),
            height: Some("170cm".to_string()),
            weight: None,
            waist: None,
            bust_chest: None,
            inseam: None,
            hips: None,
        };

        let result = handler
            .check(GradingInput::text("denim jacket"), Some(fit))
            .await
            .unwrap();

        assert_eq!(result.fit_verdict.as_deref(), Some("Size M fits true"));
    }
}
