use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{required, supplied, Draft, Labels, Resource};

/// Row of `usuarios`. `senha` is stored and returned exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub nome: String,
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserDraft {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
}

impl Draft for UserDraft {
    type Fields = UserFields;

    fn into_fields(self) -> Result<UserFields, Vec<&'static str>> {
        let mut missing = Vec::new();
        let fields = UserFields {
            nome: required("nome", self.nome, &mut missing),
            email: required("email", self.email, &mut missing),
            senha: required("senha", self.senha, &mut missing),
        };
        if missing.is_empty() {
            Ok(fields)
        } else {
            Err(missing)
        }
    }

    fn merge(self, current: UserFields) -> UserFields {
        UserFields {
            nome: supplied(self.nome, current.nome),
            email: supplied(self.email, current.email),
            senha: supplied(self.senha, current.senha),
        }
    }
}

impl Resource for User {
    type Fields = UserFields;
    type Draft = UserDraft;

    const TABLE: &'static str = "usuarios";
    const PATH: &'static str = "/usuarios";
    const COLUMNS: &'static [&'static str] = &["nome", "email", "senha"];
    const LABELS: Labels = Labels {
        singular: "o usuário",
        plural: "os usuários",
        not_found: "Usuário não encontrado",
        created: "Usuário criado com sucesso!",
        updated: "Usuário atualizado com sucesso!",
        deleted: "Usuário excluído com sucesso!",
    };

    fn id(&self) -> i32 {
        self.id
    }

    fn fields(&self) -> UserFields {
        UserFields {
            nome: self.nome.clone(),
            email: self.email.clone(),
            senha: self.senha.clone(),
        }
    }

    fn from_fields(id: i32, fields: UserFields) -> Self {
        Self {
            id,
            nome: fields.nome,
            email: fields.email,
            senha: fields.senha,
        }
    }

    fn values(fields: &UserFields) -> Vec<&str> {
        vec![fields.nome.as_str(), fields.email.as_str(), fields.senha.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_password_is_rejected() {
        let draft: UserDraft = serde_json::from_str(r#"{"nome":"Ana","email":"ana@x.io"}"#).unwrap();
        assert_eq!(draft.into_fields().unwrap_err(), vec!["senha"]);
    }

    #[test]
    fn email_format_is_not_checked() {
        let draft: UserDraft =
            serde_json::from_str(r#"{"nome":"Ana","email":"not-an-email","senha":"123"}"#).unwrap();
        assert_eq!(draft.into_fields().unwrap().email, "not-an-email");
    }

    #[test]
    fn empty_draft_merges_to_current() {
        let current = UserFields {
            nome: "Ana".into(),
            email: "ana@x.io".into(),
            senha: "123".into(),
        };
        assert_eq!(UserDraft::default().merge(current.clone()), current);
    }

    #[test]
    fn blank_password_does_not_overwrite() {
        let current = UserFields {
            nome: "Ana".into(),
            email: "ana@x.io".into(),
            senha: "123".into(),
        };
        let draft: UserDraft = serde_json::from_str(r#"{"senha":"","nome":"Ana Maria"}"#).unwrap();
        let merged = draft.merge(current);
        assert_eq!(merged.senha, "123");
        assert_eq!(merged.nome, "Ana Maria");
    }
}
