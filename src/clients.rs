/// Ordered client names. Duplicates are allowed and nothing tracks which
/// tasks mention a name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientStore {
    clients: Vec<String>,
}

impl ClientStore {
    pub fn new(clients: Vec<String>) -> Self {
        Self { clients }
    }

    pub fn clients(&self) -> &[String] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clients.iter().any(|client| client == name)
    }

    pub fn add_client(&mut self, name: &str) -> Option<usize> {
        if name.trim().is_empty() {
            return None;
        }
        log::debug!("clients: add name={name:?}");
        self.clients.push(name.to_string());
        Some(self.clients.len() - 1)
    }

    pub fn delete_client(&mut self, index: usize) -> Option<String> {
        if index >= self.clients.len() {
            return None;
        }
        log::debug!("clients: delete index={index}");
        Some(self.clients.remove(index))
    }
}
