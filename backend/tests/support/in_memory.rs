//! In-memory driven ports backing the HTTP integration tests.
//!
//! A single [`InMemoryClinic`] implements every repository plus the identity
//! stores so relations (profiles, histories, treatments) resolve against the
//! same tables, the way the PostgreSQL adapters see one database.

use std::sync::Mutex;

use async_trait::async_trait;
use infusion_backend::domain::ports::{
    DiseaseHistoryFilter, DiseaseHistoryRelation, DiseaseHistoryRepository, IdentityStoreError,
    Includes, MedicineFilter, MedicineRepository, MetricsFilter, MetricsRelation,
    MetricsRepository, RepositoryError, RoleStore, TreatmentFilter, TreatmentRelation,
    TreatmentRepository, UserInfoFilter, UserInfoRepository, UserStore,
};
use infusion_backend::domain::{
    AppUser, AppUserId, AuditStamp, Claim, DiseaseHistory, DiseaseHistoryDetails,
    DiseaseHistoryId, Medicine, MedicineId, Metrics, MetricsDetails, MetricsId, NewAppUser,
    NewDiseaseHistory, NewMedicine, NewMetrics, NewTreatment, Role, RoleId, StoredRole,
    Treatment, TreatmentDetails, TreatmentId, UserInfo, UserInfoDraft, UserInfoId, UserName,
};

struct StoredUser {
    user: AppUser,
    password: String,
    roles: Vec<Role>,
}

#[derive(Default)]
struct Tables {
    users: Vec<StoredUser>,
    roles: Vec<StoredRole>,
    claims: Vec<(RoleId, Claim)>,
    medicines: Vec<Medicine>,
    user_infos: Vec<UserInfo>,
    histories: Vec<DiseaseHistory>,
    treatments: Vec<Treatment>,
    metrics: Vec<Metrics>,
    last_id: i32,
    treatment_writes: usize,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn patient_of(&self, history_id: DiseaseHistoryId) -> Option<UserInfo> {
        let history = self.histories.iter().find(|h| h.id == history_id)?;
        self.user_infos
            .iter()
            .find(|info| info.id == history.patient_info_id)
            .cloned()
    }

    fn profile_id_for(&self, user_name: &UserName) -> Option<UserInfoId> {
        let user = self
            .users
            .iter()
            .find(|stored| stored.user.user_name == *user_name)?;
        self.user_infos
            .iter()
            .find(|info| info.app_user_id == Some(user.user.id))
            .map(|info| info.id)
    }
}

/// Shared in-memory tables behind every driven port.
#[derive(Default)]
pub struct InMemoryClinic {
    tables: Mutex<Tables>,
}

impl InMemoryClinic {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("in-memory tables lock")
    }

    pub fn role_count(&self) -> usize {
        self.lock().roles.len()
    }

    pub fn claim_count(&self) -> usize {
        self.lock().claims.len()
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn profile_count(&self) -> usize {
        self.lock().user_infos.len()
    }

    pub fn metrics_count(&self) -> usize {
        self.lock().metrics.len()
    }

    /// Number of treatment updates written since start-up.
    pub fn treatment_writes(&self) -> usize {
        self.lock().treatment_writes
    }

    pub fn treatment(&self, id: TreatmentId) -> Option<Treatment> {
        self.lock().treatments.iter().find(|t| t.id == id).cloned()
    }
}

fn dangling(entity: &str, id: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::constraint(format!("{entity} {id} does not exist"))
}

fn id_from<T>(raw: i32, ctor: fn(i32) -> Result<T, infusion_backend::domain::FieldViolation>) -> T {
    ctor(raw).expect("generated ids are positive")
}

#[async_trait]
impl UserStore for InMemoryClinic {
    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<AppUser>, IdentityStoreError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.user_name == *user_name)
            .map(|stored| stored.user.clone()))
    }

    async fn find_by_id(&self, id: &AppUserId) -> Result<Option<AppUser>, IdentityStoreError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.id == *id)
            .map(|stored| stored.user.clone()))
    }

    async fn any_users(&self) -> Result<bool, IdentityStoreError> {
        Ok(!self.lock().users.is_empty())
    }

    async fn create_user(
        &self,
        user: NewAppUser,
        password: &str,
    ) -> Result<AppUser, IdentityStoreError> {
        let mut tables = self.lock();
        if tables
            .users
            .iter()
            .any(|stored| stored.user.user_name == user.user_name)
        {
            return Err(IdentityStoreError::duplicate(user.user_name.as_str()));
        }
        let created = AppUser {
            id: AppUserId::random(),
            user_name: user.user_name,
            email: user.email,
            email_confirmed: user.email_confirmed,
            audit: user.audit.clone(),
        };
        let profile_id = tables.next_id();
        tables.user_infos.push(UserInfo {
            id: id_from(profile_id, UserInfoId::new),
            app_user_id: Some(created.id),
            details: user.profile,
            audit: user.audit,
        });
        tables.users.push(StoredUser {
            user: created.clone(),
            password: password.to_owned(),
            roles: Vec::new(),
        });
        Ok(created)
    }

    async fn check_password(
        &self,
        id: &AppUserId,
        password: &str,
    ) -> Result<bool, IdentityStoreError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.id == *id)
            .is_some_and(|stored| stored.password == password))
    }

    async fn add_to_role(&self, id: &AppUserId, role: Role) -> Result<(), IdentityStoreError> {
        let mut tables = self.lock();
        if !tables.roles.iter().any(|stored| stored.role == role) {
            return Err(IdentityStoreError::missing(format!("role {role}")));
        }
        let stored = tables
            .users
            .iter_mut()
            .find(|stored| stored.user.id == *id)
            .ok_or_else(|| IdentityStoreError::missing(format!("user {id}")))?;
        if !stored.roles.contains(&role) {
            stored.roles.push(role);
        }
        Ok(())
    }

    async fn roles_of(&self, id: &AppUserId) -> Result<Vec<Role>, IdentityStoreError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.id == *id)
            .map(|stored| stored.roles.clone())
            .unwrap_or_default())
    }

    async fn is_in_role(&self, id: &AppUserId, role: Role) -> Result<bool, IdentityStoreError> {
        Ok(self.roles_of(id).await?.contains(&role))
    }
}

#[async_trait]
impl RoleStore for InMemoryClinic {
    async fn any_roles(&self) -> Result<bool, IdentityStoreError> {
        Ok(!self.lock().roles.is_empty())
    }

    async fn create_role(&self, role: Role) -> Result<StoredRole, IdentityStoreError> {
        let mut tables = self.lock();
        if tables.roles.iter().any(|stored| stored.role == role) {
            return Err(IdentityStoreError::duplicate(role.as_str()));
        }
        let stored = StoredRole {
            id: RoleId::random(),
            role,
        };
        tables.roles.push(stored);
        Ok(stored)
    }

    async fn find_role(&self, role: Role) -> Result<Option<StoredRole>, IdentityStoreError> {
        Ok(self
            .lock()
            .roles
            .iter()
            .find(|stored| stored.role == role)
            .copied())
    }

    async fn any_role_claims(&self) -> Result<bool, IdentityStoreError> {
        Ok(!self.lock().claims.is_empty())
    }

    async fn add_claim(&self, role_id: RoleId, claim: Claim) -> Result<(), IdentityStoreError> {
        self.lock().claims.push((role_id, claim));
        Ok(())
    }

    async fn claims_of(&self, role: Role) -> Result<Vec<Claim>, IdentityStoreError> {
        let tables = self.lock();
        let Some(stored) = tables.roles.iter().find(|stored| stored.role == role) else {
            return Ok(Vec::new());
        };
        Ok(tables
            .claims
            .iter()
            .filter(|(role_id, _)| *role_id == stored.id)
            .map(|(_, claim)| claim.clone())
            .collect())
    }
}

fn medicine_matches(medicine: &Medicine, filter: &MedicineFilter) -> bool {
    match filter {
        MedicineFilter::All => true,
        MedicineFilter::Id(id) => medicine.id == *id,
        MedicineFilter::Title(title) => medicine.title == *title,
    }
}

#[async_trait]
impl MedicineRepository for InMemoryClinic {
    async fn get_by_id(&self, id: MedicineId) -> Result<Option<Medicine>, RepositoryError> {
        Ok(self.lock().medicines.iter().find(|m| m.id == id).cloned())
    }

    async fn get_all(&self, filter: MedicineFilter) -> Result<Vec<Medicine>, RepositoryError> {
        Ok(self
            .lock()
            .medicines
            .iter()
            .filter(|m| medicine_matches(m, &filter))
            .cloned()
            .collect())
    }

    async fn get_single_by_filter(
        &self,
        filter: MedicineFilter,
    ) -> Result<Option<Medicine>, RepositoryError> {
        Ok(self
            .lock()
            .medicines
            .iter()
            .find(|m| medicine_matches(m, &filter))
            .cloned())
    }

    async fn add(
        &self,
        medicine: NewMedicine,
        stamp: AuditStamp,
    ) -> Result<Medicine, RepositoryError> {
        let mut tables = self.lock();
        let id = tables.next_id();
        let created = Medicine {
            id: id_from(id, MedicineId::new),
            title: medicine.title().to_owned(),
            description: medicine.description().map(str::to_owned),
            audit: stamp,
        };
        tables.medicines.push(created.clone());
        Ok(created)
    }

    async fn update(&self, medicine: &Medicine) -> Result<Option<Medicine>, RepositoryError> {
        let mut tables = self.lock();
        let Some(slot) = tables.medicines.iter_mut().find(|m| m.id == medicine.id) else {
            return Ok(None);
        };
        *slot = medicine.clone();
        Ok(Some(medicine.clone()))
    }

    async fn delete(&self, id: MedicineId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        if tables.treatments.iter().any(|t| t.medicine_id == id) {
            return Err(RepositoryError::constraint(format!(
                "medicine {id} is referenced by treatments"
            )));
        }
        let before = tables.medicines.len();
        tables.medicines.retain(|m| m.id != id);
        Ok(tables.medicines.len() != before)
    }
}

fn user_info_matches(info: &UserInfo, filter: UserInfoFilter) -> bool {
    match filter {
        UserInfoFilter::All => true,
        UserInfoFilter::Id(id) => info.id == id,
        UserInfoFilter::AppUser(owner) => info.app_user_id == Some(owner),
    }
}

#[async_trait]
impl UserInfoRepository for InMemoryClinic {
    async fn get_by_id(&self, id: UserInfoId) -> Result<Option<UserInfo>, RepositoryError> {
        Ok(self.lock().user_infos.iter().find(|i| i.id == id).cloned())
    }

    async fn get_all(&self, filter: UserInfoFilter) -> Result<Vec<UserInfo>, RepositoryError> {
        Ok(self
            .lock()
            .user_infos
            .iter()
            .filter(|i| user_info_matches(i, filter))
            .cloned()
            .collect())
    }

    async fn get_single_by_filter(
        &self,
        filter: UserInfoFilter,
    ) -> Result<Option<UserInfo>, RepositoryError> {
        Ok(self
            .lock()
            .user_infos
            .iter()
            .find(|i| user_info_matches(i, filter))
            .cloned())
    }

    async fn add(
        &self,
        details: UserInfoDraft,
        app_user_id: Option<AppUserId>,
        stamp: AuditStamp,
    ) -> Result<UserInfo, RepositoryError> {
        let mut tables = self.lock();
        let id = tables.next_id();
        let created = UserInfo {
            id: id_from(id, UserInfoId::new),
            app_user_id,
            details,
            audit: stamp,
        };
        tables.user_infos.push(created.clone());
        Ok(created)
    }

    async fn update(&self, user_info: &UserInfo) -> Result<Option<UserInfo>, RepositoryError> {
        let mut tables = self.lock();
        let Some(slot) = tables.user_infos.iter_mut().find(|i| i.id == user_info.id) else {
            return Ok(None);
        };
        *slot = user_info.clone();
        Ok(Some(user_info.clone()))
    }

    async fn delete(&self, id: UserInfoId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        let before = tables.user_infos.len();
        tables.user_infos.retain(|i| i.id != id);
        Ok(tables.user_infos.len() != before)
    }
}

fn history_details(
    tables: &Tables,
    history: &DiseaseHistory,
    includes: &Includes<DiseaseHistoryRelation>,
) -> DiseaseHistoryDetails {
    let mut details = DiseaseHistoryDetails::bare(history.clone());
    if includes.contains(DiseaseHistoryRelation::Patient) {
        details.patient = tables
            .user_infos
            .iter()
            .find(|info| info.id == history.patient_info_id)
            .cloned();
    }
    if includes.contains(DiseaseHistoryRelation::Treatments) {
        details.treatments = Some(
            tables
                .treatments
                .iter()
                .filter(|t| t.disease_history_id == history.id)
                .cloned()
                .collect(),
        );
    }
    if includes.contains(DiseaseHistoryRelation::Metrics) {
        details.metrics = Some(
            tables
                .metrics
                .iter()
                .filter(|m| m.disease_history_id == history.id)
                .cloned()
                .collect(),
        );
    }
    details
}

fn select_histories(
    tables: &Tables,
    filter: &DiseaseHistoryFilter,
    includes: &Includes<DiseaseHistoryRelation>,
) -> Vec<DiseaseHistoryDetails> {
    let patient = match filter {
        DiseaseHistoryFilter::PatientUserName(user_name) => match tables.profile_id_for(user_name) {
            Some(id) => Some(id),
            None => return Vec::new(),
        },
        DiseaseHistoryFilter::Patient(id) => Some(*id),
        _ => None,
    };
    tables
        .histories
        .iter()
        .filter(|h| match filter {
            DiseaseHistoryFilter::All => true,
            DiseaseHistoryFilter::Id(id) => h.id == *id,
            DiseaseHistoryFilter::Patient(_) | DiseaseHistoryFilter::PatientUserName(_) => {
                Some(h.patient_info_id) == patient
            }
        })
        .map(|h| history_details(tables, h, includes))
        .collect()
}

#[async_trait]
impl DiseaseHistoryRepository for InMemoryClinic {
    async fn get_by_id(
        &self,
        id: DiseaseHistoryId,
    ) -> Result<Option<DiseaseHistory>, RepositoryError> {
        Ok(self.lock().histories.iter().find(|h| h.id == id).cloned())
    }

    async fn get_all(
        &self,
        filter: DiseaseHistoryFilter,
        includes: Includes<DiseaseHistoryRelation>,
    ) -> Result<Vec<DiseaseHistoryDetails>, RepositoryError> {
        Ok(select_histories(&self.lock(), &filter, &includes))
    }

    async fn get_single_by_filter(
        &self,
        filter: DiseaseHistoryFilter,
        includes: Includes<DiseaseHistoryRelation>,
    ) -> Result<Option<DiseaseHistoryDetails>, RepositoryError> {
        Ok(select_histories(&self.lock(), &filter, &includes)
            .into_iter()
            .next())
    }

    async fn add(
        &self,
        history: NewDiseaseHistory,
        stamp: AuditStamp,
    ) -> Result<DiseaseHistory, RepositoryError> {
        let mut tables = self.lock();
        if !tables
            .user_infos
            .iter()
            .any(|info| info.id == history.patient_info_id())
        {
            return Err(dangling("patient", history.patient_info_id()));
        }
        let id = tables.next_id();
        let created = DiseaseHistory {
            id: id_from(id, DiseaseHistoryId::new),
            patient_info_id: history.patient_info_id(),
            title: history.title().to_owned(),
            notes: history.notes().map(str::to_owned),
            audit: stamp,
        };
        tables.histories.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        history: &DiseaseHistory,
    ) -> Result<Option<DiseaseHistory>, RepositoryError> {
        let mut tables = self.lock();
        let Some(index) = tables.histories.iter().position(|h| h.id == history.id) else {
            return Ok(None);
        };
        if !tables
            .user_infos
            .iter()
            .any(|info| info.id == history.patient_info_id)
        {
            return Err(dangling("patient", history.patient_info_id));
        }
        tables.histories[index] = history.clone();
        Ok(Some(history.clone()))
    }

    async fn delete(&self, id: DiseaseHistoryId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        let before = tables.histories.len();
        tables.histories.retain(|h| h.id != id);
        Ok(tables.histories.len() != before)
    }
}

fn treatment_matches(treatment: &Treatment, filter: TreatmentFilter) -> bool {
    match filter {
        TreatmentFilter::All => true,
        TreatmentFilter::Id(id) => treatment.id == id,
        TreatmentFilter::DiseaseHistory(id) => treatment.disease_history_id == id,
        TreatmentFilter::Medicine(id) => treatment.medicine_id == id,
    }
}

fn treatment_details(
    tables: &Tables,
    treatment: &Treatment,
    includes: &Includes<TreatmentRelation>,
) -> TreatmentDetails {
    let mut details = TreatmentDetails::bare(treatment.clone());
    if includes.contains(TreatmentRelation::Medicine) {
        details.medicine = tables
            .medicines
            .iter()
            .find(|m| m.id == treatment.medicine_id)
            .cloned();
    }
    if includes.contains(TreatmentRelation::DiseaseHistory) {
        details.disease_history = tables
            .histories
            .iter()
            .find(|h| h.id == treatment.disease_history_id)
            .cloned();
    }
    if includes.contains(TreatmentRelation::Patient) {
        details.patient = tables.patient_of(treatment.disease_history_id);
    }
    details
}

#[async_trait]
impl TreatmentRepository for InMemoryClinic {
    async fn get_by_id(&self, id: TreatmentId) -> Result<Option<Treatment>, RepositoryError> {
        Ok(self.lock().treatments.iter().find(|t| t.id == id).cloned())
    }

    async fn get_all(
        &self,
        filter: TreatmentFilter,
        includes: Includes<TreatmentRelation>,
    ) -> Result<Vec<TreatmentDetails>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .treatments
            .iter()
            .filter(|t| treatment_matches(t, filter))
            .map(|t| treatment_details(&tables, t, &includes))
            .collect())
    }

    async fn get_single_by_filter(
        &self,
        filter: TreatmentFilter,
        includes: Includes<TreatmentRelation>,
    ) -> Result<Option<TreatmentDetails>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .treatments
            .iter()
            .find(|t| treatment_matches(t, filter))
            .map(|t| treatment_details(&tables, t, &includes)))
    }

    async fn add(
        &self,
        treatment: NewTreatment,
        stamp: AuditStamp,
    ) -> Result<Treatment, RepositoryError> {
        let mut tables = self.lock();
        if !tables.medicines.iter().any(|m| m.id == treatment.medicine_id()) {
            return Err(dangling("medicine", treatment.medicine_id()));
        }
        if !tables
            .histories
            .iter()
            .any(|h| h.id == treatment.disease_history_id())
        {
            return Err(dangling("disease history", treatment.disease_history_id()));
        }
        let id = tables.next_id();
        let created = Treatment {
            id: id_from(id, TreatmentId::new),
            medicine_id: treatment.medicine_id(),
            disease_history_id: treatment.disease_history_id(),
            diagnosis: treatment.diagnosis().to_owned(),
            dosing: treatment.dosing(),
            is_completed: false,
            audit: stamp,
        };
        tables.treatments.push(created.clone());
        Ok(created)
    }

    async fn update(&self, treatment: &Treatment) -> Result<Option<Treatment>, RepositoryError> {
        let mut tables = self.lock();
        let Some(index) = tables.treatments.iter().position(|t| t.id == treatment.id) else {
            return Ok(None);
        };
        if !tables.medicines.iter().any(|m| m.id == treatment.medicine_id) {
            return Err(dangling("medicine", treatment.medicine_id));
        }
        if !tables
            .histories
            .iter()
            .any(|h| h.id == treatment.disease_history_id)
        {
            return Err(dangling("disease history", treatment.disease_history_id));
        }
        tables.treatments[index] = treatment.clone();
        tables.treatment_writes += 1;
        Ok(Some(treatment.clone()))
    }

    async fn delete(&self, id: TreatmentId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        let before = tables.treatments.len();
        tables.treatments.retain(|t| t.id != id);
        Ok(tables.treatments.len() != before)
    }
}

fn metrics_matches(metrics: &Metrics, filter: MetricsFilter) -> bool {
    match filter {
        MetricsFilter::All => true,
        MetricsFilter::Id(id) => metrics.id == id,
        MetricsFilter::DiseaseHistory(id) => metrics.disease_history_id == id,
    }
}

fn metrics_details(
    tables: &Tables,
    metrics: &Metrics,
    includes: &Includes<MetricsRelation>,
) -> MetricsDetails {
    let mut details = MetricsDetails::bare(metrics.clone());
    if includes.contains(MetricsRelation::DiseaseHistory) {
        details.disease_history = tables
            .histories
            .iter()
            .find(|h| h.id == metrics.disease_history_id)
            .cloned();
    }
    details
}

#[async_trait]
impl MetricsRepository for InMemoryClinic {
    async fn get_by_id(&self, id: MetricsId) -> Result<Option<Metrics>, RepositoryError> {
        Ok(self.lock().metrics.iter().find(|m| m.id == id).cloned())
    }

    async fn get_all(
        &self,
        filter: MetricsFilter,
        includes: Includes<MetricsRelation>,
    ) -> Result<Vec<MetricsDetails>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .metrics
            .iter()
            .filter(|m| metrics_matches(m, filter))
            .map(|m| metrics_details(&tables, m, &includes))
            .collect())
    }

    async fn get_single_by_filter(
        &self,
        filter: MetricsFilter,
        includes: Includes<MetricsRelation>,
    ) -> Result<Option<MetricsDetails>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .metrics
            .iter()
            .find(|m| metrics_matches(m, filter))
            .map(|m| metrics_details(&tables, m, &includes)))
    }

    async fn add(&self, metrics: NewMetrics, stamp: AuditStamp) -> Result<Metrics, RepositoryError> {
        let mut tables = self.lock();
        if !tables
            .histories
            .iter()
            .any(|h| h.id == metrics.disease_history_id())
        {
            return Err(dangling("disease history", metrics.disease_history_id()));
        }
        let id = tables.next_id();
        let created = Metrics {
            id: id_from(id, MetricsId::new),
            name: metrics.name().to_owned(),
            value: metrics.value(),
            disease_history_id: metrics.disease_history_id(),
            audit: stamp,
        };
        tables.metrics.push(created.clone());
        Ok(created)
    }

    async fn update(&self, metrics: &Metrics) -> Result<Option<Metrics>, RepositoryError> {
        let mut tables = self.lock();
        let Some(index) = tables.metrics.iter().position(|m| m.id == metrics.id) else {
            return Ok(None);
        };
        if !tables
            .histories
            .iter()
            .any(|h| h.id == metrics.disease_history_id)
        {
            return Err(dangling("disease history", metrics.disease_history_id));
        }
        tables.metrics[index] = metrics.clone();
        Ok(Some(metrics.clone()))
    }

    async fn delete(&self, id: MetricsId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        let before = tables.metrics.len();
        tables.metrics.retain(|m| m.id != id);
        Ok(tables.metrics.len() != before)
    }
}
