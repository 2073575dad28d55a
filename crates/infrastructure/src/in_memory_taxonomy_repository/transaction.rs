use super::*;

impl InMemoryTaxonomyTransaction {
    fn leave_type_code_taken(&self, code: &LeaveCode, exclude: LeaveTypeId) -> bool {
        self.working
            .leave_types
            .values()
            .any(|stored| stored.value.id() != exclude && stored.value.code() == code)
    }

    fn leave_subtype_code_taken(&self, subtype: &LeaveSubtype) -> bool {
        self.working.leave_subtypes.values().any(|stored| {
            stored.value.id() != subtype.id()
                && stored.value.leave_type_id() == subtype.leave_type_id()
                && stored.value.code() == subtype.code()
        })
    }

    fn leave_policy_code_taken(&self, policy: &LeavePolicy) -> bool {
        self.working
            .leave_policies
            .values()
            .any(|stored| stored.value.id() != policy.id() && stored.value.code() == policy.code())
    }

    fn check_leave_subtype(&self, subtype: &LeaveSubtype) -> AppResult<()> {
        if !self
            .working
            .leave_types
            .contains_key(&subtype.leave_type_id())
        {
            return Err(AppError::ParentNotFound(format!(
                "leave type '{}' does not exist",
                subtype.leave_type_id()
            )));
        }

        if self.leave_subtype_code_taken(subtype) {
            return Err(AppError::AlreadyExists(format!(
                "leave subtype code '{}' already exists for leave type '{}'",
                subtype.code(),
                subtype.leave_type_id()
            )));
        }

        Ok(())
    }

    fn check_leave_policy(&self, policy: &LeavePolicy) -> AppResult<()> {
        if let Some(subtype_id) = policy.leave_subtype_id()
            && !self.working.leave_subtypes.contains_key(&subtype_id)
        {
            return Err(AppError::ParentNotFound(format!(
                "leave subtype '{subtype_id}' does not exist"
            )));
        }

        if self.leave_policy_code_taken(policy) {
            return Err(AppError::AlreadyExists(format!(
                "leave policy code '{}' already exists",
                policy.code()
            )));
        }

        Ok(())
    }

    fn sequence_of<K: std::hash::Hash + Eq, T>(
        table: &HashMap<K, Sequenced<T>>,
        key: &K,
        what: &str,
        id: impl std::fmt::Display,
    ) -> AppResult<u64> {
        table
            .get(key)
            .map(|stored| stored.sequence)
            .ok_or_else(|| AppError::NotFound(format!("{what} '{id}' does not exist")))
    }
}

#[async_trait]
impl TaxonomyTransaction for InMemoryTaxonomyTransaction {
    async fn find_id_by_code(
        &mut self,
        scope: CodeScope,
        code: &LeaveCode,
    ) -> AppResult<Option<Uuid>> {
        let tables = &self.working;
        Ok(match scope {
            CodeScope::LeaveType => tables
                .leave_types
                .values()
                .find(|stored| stored.value.code() == code)
                .map(|stored| stored.value.id().as_uuid()),
            CodeScope::LeaveSubtype(parent) => tables
                .leave_subtypes
                .values()
                .find(|stored| {
                    stored.value.leave_type_id() == parent && stored.value.code() == code
                })
                .map(|stored| stored.value.id().as_uuid()),
            CodeScope::LeavePolicy => tables
                .leave_policies
                .values()
                .find(|stored| stored.value.code() == code)
                .map(|stored| stored.value.id().as_uuid()),
        })
    }

    async fn find_leave_type(&mut self, id: LeaveTypeId) -> AppResult<Option<LeaveType>> {
        Ok(self
            .working
            .leave_types
            .get(&id)
            .map(|stored| stored.value.clone()))
    }

    async fn find_leave_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<Option<LeaveSubtype>> {
        Ok(self
            .working
            .leave_subtypes
            .get(&id)
            .map(|stored| stored.value.clone()))
    }

    async fn find_leave_policy(&mut self, id: LeavePolicyId) -> AppResult<Option<LeavePolicy>> {
        Ok(self
            .working
            .leave_policies
            .get(&id)
            .map(|stored| stored.value.clone()))
    }

    async fn insert_leave_type(&mut self, leave_type: &LeaveType) -> AppResult<()> {
        if self.working.leave_types.contains_key(&leave_type.id())
            || self.leave_type_code_taken(leave_type.code(), leave_type.id())
        {
            return Err(AppError::AlreadyExists(format!(
                "leave type code '{}' already exists",
                leave_type.code()
            )));
        }

        let sequence = self.working.next_sequence();
        self.working.leave_types.insert(
            leave_type.id(),
            Sequenced {
                sequence,
                value: leave_type.clone(),
            },
        );
        Ok(())
    }

    async fn update_leave_type(&mut self, leave_type: &LeaveType) -> AppResult<()> {
        let sequence = Self::sequence_of(
            &self.working.leave_types,
            &leave_type.id(),
            "leave type",
            leave_type.id(),
        )?;

        if self.leave_type_code_taken(leave_type.code(), leave_type.id()) {
            return Err(AppError::AlreadyExists(format!(
                "leave type code '{}' already exists",
                leave_type.code()
            )));
        }

        self.working.leave_types.insert(
            leave_type.id(),
            Sequenced {
                sequence,
                value: leave_type.clone(),
            },
        );
        Ok(())
    }

    async fn delete_leave_type(&mut self, id: LeaveTypeId) -> AppResult<bool> {
        if self.working.leave_types.remove(&id).is_none() {
            return Ok(false);
        }

        let children: Vec<LeaveSubtypeId> = self
            .working
            .leave_subtypes
            .values()
            .filter(|stored| stored.value.leave_type_id() == id)
            .map(|stored| stored.value.id())
            .collect();
        for subtype_id in children {
            self.delete_leave_subtype(subtype_id).await?;
        }

        Ok(true)
    }

    async fn insert_leave_subtype(&mut self, subtype: &LeaveSubtype) -> AppResult<()> {
        if self.working.leave_subtypes.contains_key(&subtype.id()) {
            return Err(AppError::AlreadyExists(format!(
                "leave subtype '{}' already exists",
                subtype.id()
            )));
        }
        self.check_leave_subtype(subtype)?;

        let sequence = self.working.next_sequence();
        self.working.leave_subtypes.insert(
            subtype.id(),
            Sequenced {
                sequence,
                value: subtype.clone(),
            },
        );
        Ok(())
    }

    async fn update_leave_subtype(&mut self, subtype: &LeaveSubtype) -> AppResult<()> {
        let sequence = Self::sequence_of(
            &self.working.leave_subtypes,
            &subtype.id(),
            "leave subtype",
            subtype.id(),
        )?;
        self.check_leave_subtype(subtype)?;

        self.working.leave_subtypes.insert(
            subtype.id(),
            Sequenced {
                sequence,
                value: subtype.clone(),
            },
        );
        Ok(())
    }

    async fn delete_leave_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<bool> {
        if self.working.leave_subtypes.remove(&id).is_none() {
            return Ok(false);
        }

        for stored in self.working.leave_policies.values_mut() {
            if stored.value.leave_subtype_id() == Some(id) {
                stored.value = stored.value.without_subtype();
            }
        }

        Ok(true)
    }

    async fn insert_leave_policy(&mut self, policy: &LeavePolicy) -> AppResult<()> {
        if self.working.leave_policies.contains_key(&policy.id()) {
            return Err(AppError::AlreadyExists(format!(
                "leave policy '{}' already exists",
                policy.id()
            )));
        }
        self.check_leave_policy(policy)?;

        let sequence = self.working.next_sequence();
        self.working.leave_policies.insert(
            policy.id(),
            Sequenced {
                sequence,
                value: policy.clone(),
            },
        );
        Ok(())
    }

    async fn update_leave_policy(&mut self, policy: &LeavePolicy) -> AppResult<()> {
        let sequence = Self::sequence_of(
            &self.working.leave_policies,
            &policy.id(),
            "leave policy",
            policy.id(),
        )?;
        self.check_leave_policy(policy)?;

        self.working.leave_policies.insert(
            policy.id(),
            Sequenced {
                sequence,
                value: policy.clone(),
            },
        );
        Ok(())
    }

    async fn delete_leave_policy(&mut self, id: LeavePolicyId) -> AppResult<bool> {
        Ok(self.working.leave_policies.remove(&id).is_some())
    }

    async fn count_policies_for_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<u64> {
        Ok(self
            .working
            .leave_policies
            .values()
            .filter(|stored| stored.value.leave_subtype_id() == Some(id))
            .count() as u64)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let Self { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
