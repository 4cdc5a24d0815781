//! Employee directory and search.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

/// The person a document batch is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub position: String,
    pub department: String,
}

impl Employee {
    pub fn new(id: &str, name: &str, position: &str, department: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            position: position.to_string(),
            department: department.to_string(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.position.to_lowercase().contains(needle)
            || self.department.to_lowercase().contains(needle)
    }
}

/// Small in-memory employee directory.
#[derive(Debug, Clone)]
pub struct EmployeeDirectory {
    employees: Vec<Employee>,
}

impl EmployeeDirectory {
    pub fn new(employees: Vec<Employee>) -> Result<Self, DirectoryError> {
        let mut seen = HashSet::new();
        for employee in &employees {
            if !seen.insert(employee.id.as_str()) {
                return Err(DirectoryError::DuplicateId(employee.id.clone()));
            }
        }
        Ok(Self { employees })
    }

    /// Loads the directory from a JSON array of employees.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DirectoryError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let employees: Vec<Employee> = serde_json::from_str(&content)?;
        Self::new(employees)
    }

    /// Case-insensitive substring search over name, position and department.
    /// A blank term returns everyone.
    pub fn search(&self, term: &str) -> Vec<&Employee> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.employees.iter().collect();
        }
        self.employees.iter().filter(|e| e.matches(&needle)).collect()
    }

    pub fn find(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

impl Default for EmployeeDirectory {
    fn default() -> Self {
        Self {
            employees: vec![
                Employee::new("EMP001", "Jan Kowalski", "Kierownik zmiany", "Produkcja"),
                Employee::new("EMP002", "Anna Nowak", "Specjalista ds. kadr", "HR"),
                Employee::new("EMP003", "Piotr Wiśniewski", "Magazynier", "Logistyka"),
                Employee::new("EMP004", "Katarzyna Wójcik", "Księgowa", "Finanse"),
                Employee::new("EMP005", "Tomasz Kamiński", "Operator wózka", "Logistyka"),
                Employee::new("EMP006", "Magdalena Lewandowska", "Kontroler jakości", "Produkcja"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_search_matches_name_case_insensitively() {
        let directory = EmployeeDirectory::default();
        let found = directory.search("kowalski");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Jan Kowalski");
    }

    #[test]
    fn test_search_matches_department_and_position() {
        let directory = EmployeeDirectory::default();
        assert_eq!(directory.search("LOGISTYKA").len(), 2);
        assert_eq!(directory.search("księgowa").len(), 1);
    }

    #[test]
    fn test_blank_search_returns_all() {
        let directory = EmployeeDirectory::default();
        assert_eq!(directory.search("   ").len(), directory.len());
    }

    #[test]
    fn test_search_without_results_is_empty() {
        let directory = EmployeeDirectory::default();
        assert!(directory.search("nobody").is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = EmployeeDirectory::new(vec![
            Employee::new("E1", "A", "x", "y"),
            Employee::new("E1", "B", "x", "y"),
        ]);
        assert!(matches!(result, Err(DirectoryError::DuplicateId(id)) if id == "E1"));
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(
            file,
            r#"[{{"id":"X1","name":"Ewa Zielińska","position":"Analityk","department":"IT"}}]"#
        )
        .unwrap();

        let directory = EmployeeDirectory::load(file.path()).unwrap();
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.find("X1").unwrap().department, "IT");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = EmployeeDirectory::load("/nonexistent/employees.json");
        assert!(matches!(result, Err(DirectoryError::ReadFile { .. })));
    }
}
