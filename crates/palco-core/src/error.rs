use thiserror::Error;

/// Error taxonomy for the extraction pipeline.
///
/// Every variant is fatal to the current invocation — the pipeline never
/// returns partial records. Callers present the failure to the operator
/// and fall back to manual data entry.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The target page did not finish its initial load in time.
    #[error("page did not finish loading within {0} seconds")]
    FetchTimeout(u64),

    /// Any other navigation-level failure (DNS, TLS, bad scheme, refused).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Distilled text fell below the minimum usable length.
    #[error("insufficient content: {length} characters after distillation")]
    InsufficientContent { length: usize },

    /// The extraction model call failed at the transport level.
    #[error("model call error: {0}")]
    ModelCall(String),

    /// The model reply could not be interpreted as JSON, even after
    /// fenced-block recovery.
    #[error("unparsable model response: {0}")]
    UnparsableResponse(String),

    /// A required field is missing or failed its format/enum check.
    #[error("missing or invalid required field: {field}")]
    MissingRequiredField { field: &'static str },
}

impl ScrapeError {
    /// Operator-facing hint shown alongside the failure. Extraction is a
    /// convenience; manual entry is always the fallback path.
    pub fn user_message(&self) -> &'static str {
        match self {
            ScrapeError::FetchTimeout(_) => {
                "A página demorou demais para carregar. Verifique a URL e tente novamente."
            }
            ScrapeError::Fetch(_) => {
                "Não foi possível acessar a página. Verifique se a URL está correta."
            }
            ScrapeError::InsufficientContent { .. } => {
                "A página não tem conteúdo suficiente para extração. Pode haver bloqueio \
                 de robôs; preencha o formulário manualmente."
            }
            ScrapeError::ModelCall(_) => {
                "O serviço de extração está indisponível no momento. Tente novamente em instantes."
            }
            ScrapeError::UnparsableResponse(_) | ScrapeError::MissingRequiredField { .. } => {
                "Não foi possível extrair os dados do evento desta página. \
                 Preencha o formulário manualmente."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field() {
        let err = ScrapeError::MissingRequiredField { field: "start_date" };
        assert!(err.to_string().contains("start_date"));
    }

    #[test]
    fn test_user_messages_are_nonempty() {
        let errors = [
            ScrapeError::FetchTimeout(30),
            ScrapeError::Fetch("dns".into()),
            ScrapeError::InsufficientContent { length: 12 },
            ScrapeError::ModelCall("503".into()),
            ScrapeError::UnparsableResponse("not json".into()),
            ScrapeError::MissingRequiredField { field: "title" },
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }
}
