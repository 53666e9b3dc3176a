use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{AttachmentStore, DocumentStore};
use crate::errors::{LedgerError, Result};
use crate::ledger::{EstablishmentId, Expense, Installment};

const APP_DIR: &str = "expense_core";
const TMP_SUFFIX: &str = "tmp";

/// File-backed document store. Records are laid out one JSON file per
/// document, scoped per establishment:
///
/// ```text
/// <root>/establishments/<scope>/expenses/<expense>.json
/// <root>/establishments/<scope>/expenses/<expense>/installments/<id>.json
/// <root>/attachments/<path_hint>
/// ```
#[derive(Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(default_root);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    fn expenses_dir(&self, scope: EstablishmentId) -> PathBuf {
        self.root
            .join("establishments")
            .join(scope.0.to_string())
            .join("expenses")
    }

    fn expense_path(&self, scope: EstablishmentId, id: Uuid) -> PathBuf {
        self.expenses_dir(scope).join(format!("{id}.json"))
    }

    fn installments_dir(&self, scope: EstablishmentId, expense_id: Uuid) -> PathBuf {
        self.expenses_dir(scope)
            .join(expense_id.to_string())
            .join("installments")
    }

    fn installment_path(&self, scope: EstablishmentId, expense_id: Uuid, id: Uuid) -> PathBuf {
        self.installments_dir(scope, expense_id)
            .join(format!("{id}.json"))
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
        let data = serde_json::to_string_pretty(value)?;
        write_atomic(path, &data)
    }
}

impl DocumentStore for JsonFileStore {
    fn insert_expense(&self, scope: EstablishmentId, expense: &Expense) -> Result<()> {
        Self::write_json(&self.expense_path(scope, expense.id), expense)
    }

    fn fetch_expense(&self, scope: EstablishmentId, id: Uuid) -> Result<Option<Expense>> {
        Self::read_json(&self.expense_path(scope, id))
    }

    fn list_expenses(&self, scope: EstablishmentId) -> Result<Vec<Expense>> {
        let dir = self.expenses_dir(scope);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut expenses = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map(|ext| ext == "json").unwrap_or(false) {
                if let Some(expense) = Self::read_json::<Expense>(&path)? {
                    expenses.push(expense);
                }
            }
        }
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(expenses)
    }

    fn update_expense(&self, scope: EstablishmentId, expense: &Expense) -> Result<()> {
        let path = self.expense_path(scope, expense.id);
        if !path.exists() {
            return Err(LedgerError::NotFound(format!("expense {}", expense.id)));
        }
        Self::write_json(&path, expense)
    }

    fn delete_expense(&self, scope: EstablishmentId, id: Uuid) -> Result<()> {
        let path = self.expense_path(scope, id);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn insert_installment(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
        installment: &Installment,
    ) -> Result<()> {
        Self::write_json(
            &self.installment_path(scope, expense_id, installment.id),
            installment,
        )
    }

    fn fetch_installment(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Installment>> {
        Self::read_json(&self.installment_path(scope, expense_id, id))
    }

    fn list_installments(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
    ) -> Result<Vec<Installment>> {
        let dir = self.installments_dir(scope, expense_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut installments = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map(|ext| ext == "json").unwrap_or(false) {
                if let Some(installment) = Self::read_json::<Installment>(&path)? {
                    installments.push(installment);
                }
            }
        }
        installments.sort_by_key(|i| i.installment_number);
        Ok(installments)
    }

    fn update_installment(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
        installment: &Installment,
    ) -> Result<()> {
        let path = self.installment_path(scope, expense_id, installment.id);
        if !path.exists() {
            return Err(LedgerError::NotFound(format!(
                "installment {}",
                installment.id
            )));
        }
        Self::write_json(&path, installment)
    }

    fn delete_installments_of(&self, scope: EstablishmentId, expense_id: Uuid) -> Result<()> {
        let dir = self.installments_dir(scope, expense_id);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }
}

impl AttachmentStore for JsonFileStore {
    fn upload(&self, bytes: &[u8], path_hint: &str) -> Result<String> {
        let sanitized = sanitize_hint(path_hint);
        let path = self.root.join("attachments").join(&sanitized);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let mut file = File::create(&path)
            .map_err(|err| LedgerError::ProofUpload(err.to_string()))?;
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|err| LedgerError::ProofUpload(err.to_string()))?;
        Ok(format!("file://{}", path.display()))
    }
}

fn default_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn sanitize_hint(hint: &str) -> String {
    let sanitized: String = hint
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "attachment".into()
    } else {
        sanitized
    }
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = path.with_extension(TMP_SUFFIX);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
