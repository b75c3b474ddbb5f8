//! User-facing alerts raised by the controllers.

use thiserror::Error;

/// Buttons offered by an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    Cancel,
    Confirm,
    OpenSettings,
}

/// Alerts of the map screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMessage {
    RouteError,
    AuthorizationWarning,
}

impl MapMessage {
    pub fn title(&self) -> &'static str {
        match self {
            MapMessage::AuthorizationWarning => "Aviso",
            MapMessage::RouteError => "Erro",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            MapMessage::AuthorizationWarning => {
                "Para usar os recursos de localização do app, você precisa permitir o uso na tela de ajustes"
            }
            MapMessage::RouteError => "Não foi possível encontrar essa rota",
        }
    }

    pub fn actions(&self) -> &'static [AlertAction] {
        match self {
            MapMessage::AuthorizationWarning => &[AlertAction::Cancel, AlertAction::OpenSettings],
            MapMessage::RouteError => &[AlertAction::Cancel],
        }
    }
}

/// Why the finder could not produce a place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FinderError {
    #[error("Não foi encontrado nenhum local com este nome")]
    NotFound,
    #[error("Erro desconhecido")]
    Unknown,
}

/// Alerts of the finder flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinderPrompt {
    /// Ask whether the found place should be added
    Confirmation { name: String },
    Error(FinderError),
}

impl FinderPrompt {
    pub fn title(&self) -> &'static str {
        match self {
            FinderPrompt::Confirmation { .. } => "Local encontrado",
            FinderPrompt::Error(_) => "Erro",
        }
    }

    pub fn text(&self) -> String {
        match self {
            FinderPrompt::Confirmation { name } => format!("Deseja adicionar {}", name),
            FinderPrompt::Error(e) => e.to_string(),
        }
    }

    pub fn actions(&self) -> &'static [AlertAction] {
        match self {
            FinderPrompt::Confirmation { .. } => &[AlertAction::Cancel, AlertAction::Confirm],
            FinderPrompt::Error(_) => &[AlertAction::Cancel],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_authorization_warning_links_to_settings() {
        assert!(MapMessage::AuthorizationWarning
            .actions()
            .contains(&AlertAction::OpenSettings));
        assert!(!MapMessage::RouteError
            .actions()
            .contains(&AlertAction::OpenSettings));
    }

    #[test]
    fn test_finder_prompt_texts() {
        let prompt = FinderPrompt::Confirmation {
            name: "MASP".to_string(),
        };
        assert_eq!(prompt.title(), "Local encontrado");
        assert_eq!(prompt.text(), "Deseja adicionar MASP");

        let not_found = FinderPrompt::Error(FinderError::NotFound);
        assert_eq!(not_found.text(), "Não foi encontrado nenhum local com este nome");
        assert_eq!(not_found.actions(), &[AlertAction::Cancel]);

        assert_eq!(
            FinderPrompt::Error(FinderError::Unknown).text(),
            "Erro desconhecido"
        );
    }
}
