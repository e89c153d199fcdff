use async_trait::async_trait;
use tracing::{error, info};

use crate::error::{ClientError, Result};
use crate::models::{
    DEFAULT_RECOMMENDATIONS, DiagnosisResult, PredictResponse, SymptomForm, SymptomReport,
};
use crate::pipeline::{ApiRequest, RequestPipeline};
use crate::workflow::Workflow;

/// Validates a symptom report and submits it to `POST /predict`.
#[derive(Debug, Clone)]
pub struct DiagnosisWorkflow {
    pipeline: RequestPipeline,
}

impl DiagnosisWorkflow {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl Workflow for DiagnosisWorkflow {
    type Input = SymptomForm;
    type Request = SymptomReport;
    type Output = DiagnosisResult;

    fn id(&self) -> &str {
        "diagnosis"
    }

    async fn prepare(&self, input: SymptomForm) -> Result<SymptomReport> {
        SymptomReport::from_form(&input)
    }

    async fn run(&self, report: SymptomReport) -> Result<DiagnosisResult> {
        info!(
            "Submitting symptom report (age {}, gender {})",
            report.age, report.gender
        );

        let request = ApiRequest::post_form("/predict", report.form_fields());
        let response: PredictResponse = self.pipeline.send(request).await.map_err(|e| {
            error!("Diagnosis error: {}", e);
            e
        })?;

        let result = interpret(response)?;
        info!(
            "Diagnosis received: {} ({})",
            result.diagnosis,
            result.confidence_display()
        );
        Ok(result)
    }
}

fn interpret(response: PredictResponse) -> Result<DiagnosisResult> {
    let diagnosis = response
        .diagnosis
        .filter(|diagnosis| !diagnosis.trim().is_empty())
        .ok_or_else(|| {
            error!("Diagnosis payload has no diagnosis label");
            ClientError::invalid_response()
        })?;
    let confidence = response
        .confidence
        .filter(|confidence| (0.0..=1.0).contains(confidence))
        .ok_or_else(|| {
            error!("Diagnosis payload has no usable confidence");
            ClientError::invalid_response()
        })?;
    let recommendations = response.recommendations.unwrap_or_else(|| {
        DEFAULT_RECOMMENDATIONS
            .iter()
            .map(|item| item.to_string())
            .collect()
    });

    Ok(DiagnosisResult {
        diagnosis,
        confidence,
        recommendations,
    })
}
