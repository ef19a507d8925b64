// `Record` impls for the backend entity types.

use stockdesk_api::{
    Branch, CertificateBatch, LearningModule, LogEntry, PrintRecord, StockMigration, StockSummary,
    Teacher,
};

use super::{Cell, EntityId, Record};

impl Record for Branch {
    const KIND: &'static str = "Branch";
    const SEARCH_FIELDS: &'static [&'static str] = &["code", "name", "regional_hub", "address"];
    const SORT_FIELDS: &'static [&'static str] = &[
        "code",
        "name",
        "regional_hub",
        "is_head_branch",
        "is_active",
        "created_at",
    ];

    fn record_id(&self) -> EntityId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Cell {
        match name {
            "id" => Cell::text(self.id.to_string()),
            "code" => Cell::text(&self.code),
            "name" => Cell::text(&self.name),
            "is_head_branch" => Cell::Bool(self.is_head_branch),
            "regional_hub" => Cell::opt_text(self.regional_hub.as_deref()),
            "address" => Cell::opt_text(self.address.as_deref()),
            "phone" => Cell::opt_text(self.phone.as_deref()),
            "is_active" => Cell::Bool(self.is_active),
            "created_at" => Cell::opt_date(self.created_at),
            "updated_at" => Cell::opt_date(self.updated_at),
            _ => Cell::Empty,
        }
    }
}

impl Record for Teacher {
    const KIND: &'static str = "Teacher";
    const SEARCH_FIELDS: &'static [&'static str] =
        &["username", "full_name", "email", "phone", "branch_code"];
    const SORT_FIELDS: &'static [&'static str] = &[
        "username",
        "full_name",
        "branch_code",
        "is_active",
        "created_at",
    ];

    fn record_id(&self) -> EntityId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Cell {
        match name {
            "id" => Cell::text(self.id.to_string()),
            "username" => Cell::text(&self.username),
            "full_name" => Cell::text(&self.full_name),
            "email" => Cell::opt_text(self.email.as_deref()),
            "phone" => Cell::opt_text(self.phone.as_deref()),
            "branch_code" => Cell::text(&self.branch_code),
            "division" => Cell::opt_text(self.division.as_deref()),
            "is_active" => Cell::Bool(self.is_active),
            "created_at" => Cell::opt_date(self.created_at),
            _ => Cell::Empty,
        }
    }
}

impl Record for LearningModule {
    const KIND: &'static str = "Module";
    const SEARCH_FIELDS: &'static [&'static str] = &["code", "name", "description", "division"];
    const SORT_FIELDS: &'static [&'static str] = &[
        "code",
        "name",
        "division",
        "min_age",
        "max_age",
        "is_active",
        "created_at",
    ];

    fn record_id(&self) -> EntityId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Cell {
        match name {
            "id" => Cell::text(self.id.to_string()),
            "code" => Cell::text(&self.code),
            "name" => Cell::text(&self.name),
            "description" => Cell::opt_text(self.description.as_deref()),
            "division" => Cell::opt_text(self.division.as_deref()),
            "min_age" => self.min_age.map_or(Cell::Empty, |a| Cell::Int(a.into())),
            "max_age" => self.max_age.map_or(Cell::Empty, |a| Cell::Int(a.into())),
            "is_active" => Cell::Bool(self.is_active),
            "created_at" => Cell::opt_date(self.created_at),
            _ => Cell::Empty,
        }
    }
}

impl Record for CertificateBatch {
    const KIND: &'static str = "Batch";
    const SEARCH_FIELDS: &'static [&'static str] = &["branch_code", "batch_number", "notes"];
    const SORT_FIELDS: &'static [&'static str] = &[
        "branch_code",
        "batch_number",
        "certificate_quantity",
        "medal_quantity",
        "created_at",
    ];

    fn record_id(&self) -> EntityId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Cell {
        match name {
            "id" => Cell::text(self.id.to_string()),
            "branch_code" => Cell::text(&self.branch_code),
            "batch_number" => Cell::opt_text(self.batch_number.as_deref()),
            "certificate_quantity" => Cell::count(self.certificate_quantity),
            "medal_quantity" => Cell::count(self.medal_quantity),
            "notes" => Cell::opt_text(self.notes.as_deref()),
            "created_at" => Cell::opt_date(self.created_at),
            _ => Cell::Empty,
        }
    }
}

impl Record for StockSummary {
    const KIND: &'static str = "Stock";
    const SEARCH_FIELDS: &'static [&'static str] = &["branch_code", "branch_name", "regional_hub"];
    const SORT_FIELDS: &'static [&'static str] =
        &["branch_code", "branch_name", "certificates", "medals"];

    fn record_id(&self) -> EntityId {
        EntityId::Text(self.branch_code.clone())
    }

    fn field(&self, name: &str) -> Cell {
        match name {
            "branch_code" => Cell::text(&self.branch_code),
            "branch_name" => Cell::opt_text(self.branch_name.as_deref()),
            "certificates" => Cell::count(self.certificates),
            "medals" => Cell::count(self.medals),
            "regional_hub" => Cell::opt_text(self.regional_hub.as_deref()),
            _ => Cell::Empty,
        }
    }
}

impl Record for StockMigration {
    const KIND: &'static str = "Migration";
    const SEARCH_FIELDS: &'static [&'static str] = &["from_branch", "to_branch", "notes"];
    const SORT_FIELDS: &'static [&'static str] = &[
        "from_branch",
        "to_branch",
        "certificate_quantity",
        "medal_quantity",
        "created_at",
    ];

    fn record_id(&self) -> EntityId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Cell {
        match name {
            "id" => Cell::text(self.id.to_string()),
            "from_branch" => Cell::text(&self.from_branch),
            "to_branch" => Cell::text(&self.to_branch),
            "branches" => Cell::List(vec![self.from_branch.clone(), self.to_branch.clone()]),
            "certificate_quantity" => Cell::count(self.certificate_quantity),
            "medal_quantity" => Cell::count(self.medal_quantity),
            "notes" => Cell::opt_text(self.notes.as_deref()),
            "created_at" => Cell::opt_date(self.created_at),
            _ => Cell::Empty,
        }
    }
}

impl Record for LogEntry {
    const KIND: &'static str = "Log entry";
    const SEARCH_FIELDS: &'static [&'static str] = &["action", "description", "actor", "entity_type"];
    const SORT_FIELDS: &'static [&'static str] = &["action", "actor", "entity_type", "created_at"];

    fn record_id(&self) -> EntityId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Cell {
        match name {
            "id" => Cell::text(self.id.to_string()),
            "action" => Cell::text(&self.action),
            "entity_type" => Cell::opt_text(self.entity_type.as_deref()),
            "description" => Cell::text(&self.description),
            "actor" => Cell::opt_text(self.actor.as_deref()),
            "branch_code" => Cell::opt_text(self.branch_code.as_deref()),
            "created_at" => Cell::opt_date(self.created_at),
            _ => Cell::Empty,
        }
    }
}

impl Record for PrintRecord {
    const KIND: &'static str = "Print record";
    const SEARCH_FIELDS: &'static [&'static str] =
        &["certificate_number", "student_name", "module_code", "module_name"];
    const SORT_FIELDS: &'static [&'static str] =
        &["student_name", "module_code", "certificate_number", "printed_at"];

    fn record_id(&self) -> EntityId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Cell {
        match name {
            "id" => Cell::text(self.id.to_string()),
            "certificate_number" => Cell::opt_text(self.certificate_number.as_deref()),
            "student_name" => Cell::text(&self.student_name),
            "module_code" => Cell::text(&self.module_code),
            "module_name" => Cell::opt_text(self.module_name.as_deref()),
            "teacher_username" => Cell::opt_text(self.teacher_username.as_deref()),
            "branch_code" => Cell::opt_text(self.branch_code.as_deref()),
            "printed_at" => Cell::opt_date(self.printed_at),
            _ => Cell::Empty,
        }
    }
}
