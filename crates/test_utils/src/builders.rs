//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults. Tests
//! set only the fields they care about; everything else is filled with fixed
//! or faked values.

use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rust_decimal::Decimal;
use uuid::Uuid;

use domain_billing::{BillingInterval, NewPlan, Plan};
use infra_db::repositories::{NewClinic, NewDevice, NewMessage, NewNotification};

/// Builder for plan inputs
///
/// Defaults to the canonical test plan: "Basic", 10.00 usd, monthly.
pub struct PlanBuilder {
    name: String,
    amount: Decimal,
    currency: String,
    interval: BillingInterval,
    description: Option<String>,
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            name: "Basic".to_string(),
            amount: Decimal::new(1000, 2),
            currency: "usd".to_string(),
            interval: BillingInterval::Month,
            description: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_interval(mut self, interval: BillingInterval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> NewPlan {
        NewPlan {
            name: self.name,
            amount: self.amount,
            currency: self.currency,
            interval: self.interval,
            description: self.description,
        }
    }

    /// Builds a persisted-looking plan carrying the given provider id
    pub fn build_synced(self, remote_id: impl Into<String>) -> Plan {
        Plan::from_new(self.build(), remote_id.into())
    }
}

/// Builder for clinic inputs with faked contact data
pub struct ClinicBuilder {
    name: String,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    company_id: Option<Uuid>,
}

impl Default for ClinicBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClinicBuilder {
    pub fn new() -> Self {
        Self {
            name: CompanyName().fake(),
            address: Some(Sentence(3..6).fake()),
            phone: Some(PhoneNumber().fake()),
            email: Some(SafeEmail().fake()),
            company_id: Some(Uuid::new_v4()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_company_id(mut self, company_id: Uuid) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn build(self) -> NewClinic {
        NewClinic {
            name: self.name,
            address: self.address,
            phone: self.phone,
            email: self.email,
            company_id: self.company_id,
        }
    }
}

/// Builder for device inputs
pub struct DeviceBuilder {
    imei: String,
    name: Option<String>,
    user_id: Option<Uuid>,
    battery: Option<i32>,
    phone: Option<String>,
    mode: Option<String>,
    company_id: Option<Uuid>,
    device_uuid: Option<String>,
}

impl Default for DeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceBuilder {
    pub fn new() -> Self {
        Self {
            imei: (100_000_000_000_000u64..999_999_999_999_999u64)
                .fake::<u64>()
                .to_string(),
            name: Some("Tracker".to_string()),
            user_id: Some(Uuid::new_v4()),
            battery: Some((0..100).fake()),
            phone: Some(PhoneNumber().fake()),
            mode: Some("active".to_string()),
            company_id: Some(Uuid::new_v4()),
            device_uuid: Some(Uuid::new_v4().to_string()),
        }
    }

    pub fn with_imei(mut self, imei: impl Into<String>) -> Self {
        self.imei = imei.into();
        self
    }

    pub fn with_battery(mut self, battery: i32) -> Self {
        self.battery = Some(battery);
        self
    }

    pub fn build(self) -> NewDevice {
        NewDevice {
            imei: self.imei,
            name: self.name,
            user_id: self.user_id,
            battery: self.battery,
            phone: self.phone,
            mode: self.mode,
            company_id: self.company_id,
            device_uuid: self.device_uuid,
        }
    }
}

/// Builder for message inputs
pub struct MessageBuilder {
    body: String,
    conversation_id: Uuid,
    user_id: Uuid,
    read: bool,
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self {
            body: Sentence(3..10).fake(),
            conversation_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            read: false,
        }
    }

    pub fn with_conversation(mut self, conversation_id: Uuid) -> Self {
        self.conversation_id = conversation_id;
        self
    }

    pub fn read(mut self) -> Self {
        self.read = true;
        self
    }

    pub fn build(self) -> NewMessage {
        NewMessage {
            body: self.body,
            conversation_id: self.conversation_id,
            user_id: self.user_id,
            read: self.read,
        }
    }
}

/// Builder for notification inputs
pub struct NotificationBuilder {
    content: String,
    status: i32,
    receiver: Uuid,
    sender: Uuid,
    kind: Option<String>,
    employee_request: Option<i32>,
}

impl Default for NotificationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBuilder {
    pub fn new() -> Self {
        Self {
            content: Sentence(3..10).fake(),
            status: 0,
            receiver: Uuid::new_v4(),
            sender: Uuid::new_v4(),
            kind: Some("general".to_string()),
            employee_request: None,
        }
    }

    pub fn with_receiver(mut self, receiver: Uuid) -> Self {
        self.receiver = receiver;
        self
    }

    pub fn with_employee_request(mut self, request_id: i32) -> Self {
        self.employee_request = Some(request_id);
        self
    }

    pub fn build(self) -> NewNotification {
        NewNotification {
            content: self.content,
            status: self.status,
            receiver: self.receiver,
            sender: self.sender,
            kind: self.kind,
            employee_request: self.employee_request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_builder_defaults_match_the_canonical_plan() {
        let plan = PlanBuilder::new().build();
        assert_eq!(plan.name, "Basic");
        assert_eq!(plan.amount, Decimal::new(1000, 2));
        assert_eq!(plan.interval, BillingInterval::Month);
    }

    #[test]
    fn synced_plan_carries_the_remote_id() {
        let plan = PlanBuilder::new().build_synced("plan_123");
        assert_eq!(plan.remote_id.as_deref(), Some("plan_123"));
    }

    #[test]
    fn device_builder_generates_a_plausible_imei() {
        let device = DeviceBuilder::new().build();
        assert_eq!(device.imei.len(), 15);
        assert!(device.imei.chars().all(|c| c.is_ascii_digit()));
    }
}
