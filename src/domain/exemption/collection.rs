//! Stored collections and their field names.

use std::fmt;

/// Stored field names shared by the entity serializers and the query layer.
pub mod fields {
    pub const REGISTRATION: &str = "MATRICULA";
    pub const COURSE_ID: &str = "ID_CURSO";
    pub const SUBJECT_ID: &str = "ID_DISCIPLINA";
    pub const NAME: &str = "NOME";
    pub const FULL_NAME: &str = "NOME_COMPLETO";
    pub const CREDIT_HOURS: &str = "CARGA_HORARIA";
    pub const CREATED_AT: &str = "DATA_CADASTRO";
    pub const UPDATED_AT: &str = "DATA_ATUALIZACAO";
    pub const SYLLABUS: &str = "ESTRUTURA_CURRICULAR";
    pub const SUBJECT_IDS: &str = "ID_DISCIPLINAS";
    pub const STATUS: &str = "SITUACAO";
}

/// The four collections the webhook reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    Courses,
    Subjects,
    Requests,
}

impl Collection {
    /// Reconciliation order used by the seeder.
    pub const ALL: [Collection; 4] = [
        Collection::Students,
        Collection::Courses,
        Collection::Subjects,
        Collection::Requests,
    ];

    /// Stored collection name.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Students => "ALUNO",
            Collection::Courses => "CURSO",
            Collection::Subjects => "DISCIPLINA",
            Collection::Requests => "REQUISICAO",
        }
    }

    /// Field that identifies a row and carries the sentinel value.
    pub fn key_field(&self) -> &'static str {
        match self {
            Collection::Students | Collection::Requests => fields::REGISTRATION,
            Collection::Courses => fields::COURSE_ID,
            Collection::Subjects => fields::SUBJECT_ID,
        }
    }

    /// Key value of the placeholder row kept in every collection.
    pub fn sentinel_key(&self) -> &'static str {
        match self {
            Collection::Students | Collection::Requests => "MATRICULA_MOCK",
            Collection::Courses => "CURSO_MOCK",
            Collection::Subjects => "DISCIPLINA_MOCK",
        }
    }

    /// Reference collections are reconciled against the embedded catalogue;
    /// the others are wiped.
    pub fn is_reference(&self) -> bool {
        matches!(self, Collection::Courses | Collection::Subjects)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
