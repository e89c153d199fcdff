use healthqai_client::{DisplayState, Session, Tab, ViewState};

const DISCLAIMER: &str = "Note: This is not a substitute for professional medical advice. \
Always consult a healthcare provider.";

pub fn render(view: &ViewState, session: &Session) -> String {
    let mut lines = vec![
        "HealthQAI - AI-Powered Healthcare Assistant".to_string(),
        view.backend_status.clone(),
    ];

    if view.active_tab == Tab::Qa || session.is_authenticated() {
        lines.push(session_line(session));
    }

    match &view.display {
        DisplayState::Idle => {}
        DisplayState::Loading => lines.push("Processing your request...".to_string()),
        DisplayState::Error(message) => lines.push(format!("Error: {}", message)),
        DisplayState::ShowingDiagnosisResult(result) => {
            lines.push(String::new());
            lines.push("Diagnosis Results".to_string());
            lines.push(format!("  Condition:  {}", result.diagnosis));
            lines.push(format!("  Confidence: {}", result.confidence_display()));
            lines.push("  Recommendations:".to_string());
            lines.extend(result.recommendations.iter().map(|item| format!("    - {}", item)));
        }
        DisplayState::ShowingQaResult(result) => {
            lines.push(String::new());
            lines.push(format!("Q: {}", result.question));
            lines.push(format!("A: {}", result.answer));
            if !result.sources.is_empty() {
                lines.push("Sources:".to_string());
                lines.extend(result.sources.iter().map(|source| format!("  - {}", source)));
            }
        }
    }

    if view.session_expired {
        lines.push("Your session may have expired. Run `healthqai login` again.".to_string());
    } else if view.login_prompt {
        lines.push("Run `healthqai login` to sign in.".to_string());
    }

    lines.push(String::new());
    lines.push(DISCLAIMER.to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn session_line(session: &Session) -> String {
    match (&session.token, &session.role) {
        (None, _) => "Not logged in".to_string(),
        (Some(_), Some(role)) => format!("Logged in [{}]", role),
        (Some(_), None) => "Logged in [role unknown]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthqai_client::{DiagnosisResult, QaResult};

    fn doctor() -> Session {
        Session {
            token: Some("T".to_string()),
            role: Some("doctor".to_string()),
        }
    }

    #[test]
    fn test_render_diagnosis() {
        let view = ViewState {
            display: DisplayState::ShowingDiagnosisResult(DiagnosisResult {
                diagnosis: "Common cold".to_string(),
                confidence: 0.823,
                recommendations: vec!["Rest and hydration".to_string()],
            }),
            ..ViewState::default()
        };
        let text = render(&view, &Session::default());
        assert!(text.contains("Condition:  Common cold"));
        assert!(text.contains("Confidence: 82.3%"));
        assert!(text.contains("- Rest and hydration"));
        assert!(!text.contains("Not logged in"));
        assert!(text.ends_with("Always consult a healthcare provider.\n"));
    }

    #[test]
    fn test_render_answer_hides_empty_sources() {
        let view = ViewState {
            active_tab: Tab::Qa,
            display: DisplayState::ShowingQaResult(QaResult {
                question: "Is a fever dangerous?".to_string(),
                answer: "Usually not.".to_string(),
                sources: vec![],
            }),
            ..ViewState::default()
        };
        let text = render(&view, &doctor());
        assert!(text.contains("Logged in [doctor]"));
        assert!(text.contains("A: Usually not."));
        assert!(!text.contains("Sources:"));
    }

    #[test]
    fn test_render_login_prompt() {
        let view = ViewState {
            active_tab: Tab::Qa,
            display: DisplayState::Error("Please login to ask questions".to_string()),
            login_prompt: true,
            ..ViewState::default()
        };
        let text = render(&view, &Session::default());
        assert!(text.contains("Error: Please login to ask questions"));
        assert!(text.contains("Not logged in"));
        assert!(text.contains("healthqai login"));
    }
}
