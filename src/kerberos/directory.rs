use std::collections::HashSet;
use crate::kerberos::principal::Principal;

#[derive(Clone, Debug, Default)]
pub struct PrincipalDirectory {
    principals: HashSet<Principal>,
}

impl PrincipalDirectory {
    pub fn new(principals: impl IntoIterator<Item = Principal>) -> Self {
        Self {
            principals: principals.into_iter().collect(),
        }
    }

    #[inline]
    pub fn exists(&self, principal: &Principal) -> bool {
        self.principals.contains(principal)
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

impl FromIterator<Principal> for PrincipalDirectory {
    fn from_iter<T: IntoIterator<Item = Principal>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod test {
    use super::PrincipalDirectory;
    use crate::kerberos::principal::Principal;

    #[test]
    fn membership() {
        let directory: PrincipalDirectory = ["client1", "client2", "client1"]
            .into_iter()
            .map(|name| Principal::new(name).unwrap())
            .collect();

        assert_eq!(directory.len(), 2);
        assert!(directory.exists(&Principal::new("client1").unwrap()));
        assert!(directory.exists(&Principal::new("client2").unwrap()));
        assert!(!directory.exists(&Principal::new("ghost").unwrap()));
        assert!(PrincipalDirectory::default().is_empty());
    }
}
