use crate::assess::{DependencyAnalyses, ImpactAssessor};
use crate::model::{BreakingChangeAnalysis, DependencyUpdate, ImpactAssessment, SecurityAnalysis};
use crate::traits::{AssessError, BreakingChangeDetector, SecurityDetector};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

/// Runs the collaborator detectors for a batch, then assesses it.
///
/// Detector calls are bounded by a semaphore. A failing detector only drops
/// its analysis for that dependency; the assessment itself always completes.
pub struct AssessmentExecutor {
    semaphore: Arc<Semaphore>,
    assessor: Arc<ImpactAssessor>,
}

impl AssessmentExecutor {
    pub fn new(assessor: ImpactAssessor, concurrency_limit: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency_limit)),
            assessor: Arc::new(assessor),
        }
    }

    pub fn assessor(&self) -> &ImpactAssessor {
        &self.assessor
    }

    #[instrument(skip_all, fields(count = updates.len()))]
    pub async fn execute<B, S>(
        &self,
        breaking: Arc<B>,
        security: Arc<S>,
        updates: Vec<DependencyUpdate>,
    ) -> Result<ImpactAssessment, AssessError>
    where
        B: BreakingChangeDetector + 'static,
        S: SecurityDetector + 'static,
    {
        info!(
            "Running detectors: {} / {}",
            breaking.detector_id(),
            security.detector_id()
        );

        let mut tasks = JoinSet::new();
        for (index, update) in updates.iter().cloned().enumerate() {
            let semaphore = Arc::clone(&self.semaphore);
            let breaking = Arc::clone(&breaking);
            let security = Arc::clone(&security);

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| AssessError::Concurrency(format!("Semaphore error: {}", e)))?;

                let breaking_analysis = detect_breaking(breaking.as_ref(), &update).await;
                let security_analysis = detect_security(security.as_ref(), &update).await;

                Ok::<_, AssessError>((index, breaking_analysis, security_analysis))
            });
        }

        let mut analyses = DependencyAnalyses::new();
        while let Some(joined) = tasks.join_next().await {
            let (index, breaking_analysis, security_analysis) = joined??;
            if let Some(analysis) = breaking_analysis {
                analyses.breaking.insert(index, analysis);
            }
            if let Some(analysis) = security_analysis {
                analyses.security.insert(index, analysis);
            }
        }

        let assessment = self.assessor.assess_with_analyses(&updates, &analyses);

        info!(
            "Finished assessment: {} ({} dependencies)",
            assessment.recommended_changeset_type,
            assessment.dependencies.len()
        );
        Ok(assessment)
    }
}

async fn detect_breaking<B>(detector: &B, update: &DependencyUpdate) -> Option<BreakingChangeAnalysis>
where
    B: BreakingChangeDetector + ?Sized,
{
    match detector.detect(update).await {
        Ok(analysis) => Some(analysis),
        Err(e) => {
            warn!(
                dependency = %update.name,
                detector = detector.detector_id(),
                error = %e,
                "Breaking-change detection failed"
            );
            None
        }
    }
}

async fn detect_security<S>(detector: &S, update: &DependencyUpdate) -> Option<SecurityAnalysis>
where
    S: SecurityDetector + ?Sized,
{
    match detector.detect(update).await {
        Ok(analysis) => Some(analysis),
        Err(e) => {
            warn!(
                dependency = %update.name,
                detector = detector.detector_id(),
                error = %e,
                "Security detection failed"
            );
            None
        }
    }
}
