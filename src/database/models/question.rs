use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{required, supplied, Draft, Labels, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i32,
    pub enunciado: String,
    pub disciplina: String,
    pub tema: String,
    pub nivel: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFields {
    pub enunciado: String,
    pub disciplina: String,
    pub tema: String,
    pub nivel: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuestionDraft {
    pub enunciado: Option<String>,
    pub disciplina: Option<String>,
    pub tema: Option<String>,
    pub nivel: Option<String>,
}

impl Draft for QuestionDraft {
    type Fields = QuestionFields;

    fn into_fields(self) -> Result<QuestionFields, Vec<&'static str>> {
        let mut missing = Vec::new();
        let fields = QuestionFields {
            enunciado: required("enunciado", self.enunciado, &mut missing),
            disciplina: required("disciplina", self.disciplina, &mut missing),
            tema: required("tema", self.tema, &mut missing),
            nivel: required("nivel", self.nivel, &mut missing),
        };
        if missing.is_empty() {
            Ok(fields)
        } else {
            Err(missing)
        }
    }

    fn merge(self, current: QuestionFields) -> QuestionFields {
        QuestionFields {
            enunciado: supplied(self.enunciado, current.enunciado),
            disciplina: supplied(self.disciplina, current.disciplina),
            tema: supplied(self.tema, current.tema),
            nivel: supplied(self.nivel, current.nivel),
        }
    }
}

impl Resource for Question {
    type Fields = QuestionFields;
    type Draft = QuestionDraft;

    const TABLE: &'static str = "questoes";
    const PATH: &'static str = "/questoes";
    const COLUMNS: &'static [&'static str] = &["enunciado", "disciplina", "tema", "nivel"];
    const LABELS: Labels = Labels {
        singular: "a questão",
        plural: "as questões",
        not_found: "Questão não encontrada",
        created: "Questão criada com sucesso!",
        updated: "Questão atualizada com sucesso!",
        deleted: "Questão excluída com sucesso!",
    };

    fn id(&self) -> i32 {
        self.id
    }

    fn fields(&self) -> QuestionFields {
        QuestionFields {
            enunciado: self.enunciado.clone(),
            disciplina: self.disciplina.clone(),
            tema: self.tema.clone(),
            nivel: self.nivel.clone(),
        }
    }

    fn from_fields(id: i32, fields: QuestionFields) -> Self {
        Self {
            id,
            enunciado: fields.enunciado,
            disciplina: fields.disciplina,
            tema: fields.tema,
            nivel: fields.nivel,
        }
    }

    fn values(fields: &QuestionFields) -> Vec<&str> {
        vec![
            fields.enunciado.as_str(),
            fields.disciplina.as_str(),
            fields.tema.as_str(),
            fields.nivel.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(json: &str) -> QuestionDraft {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn complete_draft_validates() {
        let fields = draft(
            r#"{"enunciado":"2+2=?","disciplina":"Math","tema":"Arithmetic","nivel":"easy"}"#,
        )
        .into_fields()
        .unwrap();
        assert_eq!(fields.enunciado, "2+2=?");
        assert_eq!(Question::values(&fields), vec!["2+2=?", "Math", "Arithmetic", "easy"]);
    }

    #[test]
    fn reports_every_missing_or_empty_field() {
        let missing = draft(r#"{"enunciado":"","tema":"Arithmetic"}"#)
            .into_fields()
            .unwrap_err();
        assert_eq!(missing, vec!["enunciado", "disciplina", "nivel"]);
    }

    #[test]
    fn merge_keeps_omitted_fields() {
        let current = QuestionFields {
            enunciado: "2+2=?".into(),
            disciplina: "Math".into(),
            tema: "Arithmetic".into(),
            nivel: "easy".into(),
        };
        let merged = draft(r#"{"nivel":"hard"}"#).merge(current.clone());
        assert_eq!(merged.nivel, "hard");
        assert_eq!(merged.enunciado, current.enunciado);
        assert_eq!(merged.disciplina, current.disciplina);
        assert_eq!(merged.tema, current.tema);
    }

    #[test]
    fn empty_string_keeps_stored_value() {
        let current = QuestionFields {
            enunciado: "2+2=?".into(),
            disciplina: "Math".into(),
            tema: "Arithmetic".into(),
            nivel: "easy".into(),
        };
        let merged = draft(r#"{"nivel":"","tema":"Algebra"}"#).merge(current);
        assert_eq!(merged.nivel, "easy");
        assert_eq!(merged.tema, "Algebra");
    }

    #[test]
    fn columns_match_values_order() {
        let q = Question::from_fields(
            7,
            QuestionFields {
                enunciado: "a".into(),
                disciplina: "b".into(),
                tema: "c".into(),
                nivel: "d".into(),
            },
        );
        assert_eq!(q.id(), 7);
        assert_eq!(Question::COLUMNS.len(), Question::values(&q.fields()).len());
    }
}
