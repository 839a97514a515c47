//! Dashboard report built from a user's customers, payments and follow-ups.
//!
//! The aggregation is a pure function of the loaded rows and the reference
//! instant `now`, so it can be exercised without a database.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::domain::customer::Customer;
use crate::domain::followup::Followup;
use crate::domain::payment::Payment;
use crate::domain::types::{FollowupStatus, PaymentStatus};

/// Customers created within this window count as recent.
pub const RECENT_CUSTOMER_DAYS: i64 = 30;
/// Number of newest rows per kind considered for the activity feed.
pub const ACTIVITY_PER_KIND: usize = 3;
/// Maximum length of the merged activity feed.
pub const ACTIVITY_LIMIT: usize = 10;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub customers: CustomerStats,
    pub payments: PaymentStats,
    pub followups: FollowupStats,
    pub recent_activity: Vec<ActivityItem>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, Default)]
pub struct CustomerStats {
    pub total: usize,
    pub recent: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub total: usize,
    pub total_amount: f64,
    pub paid: usize,
    pub paid_amount: f64,
    pub overdue: usize,
    pub overdue_amount: f64,
    pub pending: usize,
    pub pending_amount: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FollowupStats {
    pub total: usize,
    pub scheduled: usize,
    pub overdue: usize,
    pub completed: usize,
    /// Percentage of follow-ups completed, `0.0` when there are none.
    pub completion_rate: f64,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Customer,
    Payment,
    Followup,
}

impl ActivityKind {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Payment => "payment",
            Self::Followup => "followup",
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ActivityItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: NaiveDateTime,
}

impl ActivityItem {
    fn new(kind: ActivityKind, id: i32, description: String, timestamp: NaiveDateTime) -> Self {
        Self {
            id: format!("{}-{id}", kind.prefix()),
            kind,
            description,
            timestamp,
        }
    }
}

impl CustomerStats {
    fn compute(customers: &[Customer], now: NaiveDateTime) -> Self {
        let cutoff = now - Duration::days(RECENT_CUSTOMER_DAYS);
        Self {
            total: customers.len(),
            recent: customers.iter().filter(|c| c.created_at > cutoff).count(),
        }
    }
}

impl PaymentStats {
    fn compute(payments: &[Payment]) -> Self {
        let mut stats = Self {
            total: payments.len(),
            ..Self::default()
        };

        for payment in payments {
            let amount = payment.amount.get();
            stats.total_amount += amount;
            match payment.status {
                PaymentStatus::Paid => {
                    stats.paid += 1;
                    stats.paid_amount += amount;
                }
                PaymentStatus::Overdue => {
                    stats.overdue += 1;
                    stats.overdue_amount += amount;
                }
                PaymentStatus::Pending => {
                    stats.pending += 1;
                    stats.pending_amount += amount;
                }
                PaymentStatus::Cancelled => {}
            }
        }

        stats
    }
}

impl FollowupStats {
    fn compute(followups: &[Followup], now: NaiveDateTime) -> Self {
        let mut stats = Self {
            total: followups.len(),
            ..Self::default()
        };

        for followup in followups {
            match followup.status {
                FollowupStatus::Scheduled => {
                    stats.scheduled += 1;
                    if followup.scheduled_date < now {
                        stats.overdue += 1;
                    }
                }
                FollowupStatus::Completed => stats.completed += 1,
                FollowupStatus::Sent | FollowupStatus::Cancelled => {}
            }
        }

        if stats.total > 0 {
            stats.completion_rate = stats.completed as f64 / stats.total as f64 * 100.0;
        }

        stats
    }
}

/// Returns the `n` newest items according to `created_at`.
fn newest<T, F>(items: &[T], created_at: F, n: usize) -> Vec<&T>
where
    F: Fn(&T) -> NaiveDateTime,
{
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    sorted.truncate(n);
    sorted
}

fn recent_activity(
    customers: &[Customer],
    payments: &[Payment],
    followups: &[Followup],
) -> Vec<ActivityItem> {
    let mut activity = Vec::with_capacity(ACTIVITY_PER_KIND * 3);

    activity.extend(
        newest(customers, |c| c.created_at, ACTIVITY_PER_KIND)
            .into_iter()
            .map(|c| {
                ActivityItem::new(
                    ActivityKind::Customer,
                    c.id.get(),
                    "New customer added".to_string(),
                    c.created_at,
                )
            }),
    );

    activity.extend(
        newest(payments, |p| p.created_at, ACTIVITY_PER_KIND)
            .into_iter()
            .map(|p| {
                ActivityItem::new(
                    ActivityKind::Payment,
                    p.id.get(),
                    format!("Payment {} - {}", p.status, format_tsh(p.amount.get())),
                    p.created_at,
                )
            }),
    );

    activity.extend(
        newest(followups, |f| f.created_at, ACTIVITY_PER_KIND)
            .into_iter()
            .map(|f| {
                ActivityItem::new(
                    ActivityKind::Followup,
                    f.id.get(),
                    format!("Follow-up {}", f.status),
                    f.created_at,
                )
            }),
    );

    activity.sort_by_key(|item| std::cmp::Reverse(item.timestamp));
    activity.truncate(ACTIVITY_LIMIT);
    activity
}

impl DashboardStats {
    /// Aggregates the rows of a single user into the dashboard report.
    pub fn compute(
        customers: &[Customer],
        payments: &[Payment],
        followups: &[Followup],
        now: NaiveDateTime,
    ) -> Self {
        Self {
            customers: CustomerStats::compute(customers, now),
            payments: PaymentStats::compute(payments),
            followups: FollowupStats::compute(followups, now),
            recent_activity: recent_activity(customers, payments, followups),
        }
    }
}

/// Formats an amount as Tanzanian shillings, e.g. `TSh 1,250,000`.
pub fn format_tsh(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("TSh -{grouped}")
    } else {
        format!("TSh {grouped}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::types::{
        Amount, CustomerId, CustomerName, CustomerSource, FollowupId, FollowupMethod,
        FollowupType, PaymentId, UserId,
    };

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn customer(id: i32, created_at: NaiveDateTime) -> Customer {
        Customer {
            id: CustomerId::new(id).unwrap(),
            user_id: UserId::new("u").unwrap(),
            name: CustomerName::new(format!("Customer {id}")).unwrap(),
            email: None,
            phone: None,
            address: None,
            notes: None,
            source: CustomerSource::Manual,
            created_at,
            updated_at: created_at,
        }
    }

    fn payment(id: i32, amount: f64, status: PaymentStatus, created_at: NaiveDateTime) -> Payment {
        Payment {
            id: PaymentId::new(id).unwrap(),
            user_id: UserId::new("u").unwrap(),
            customer_id: CustomerId::new(1).unwrap(),
            amount: Amount::new(amount).unwrap(),
            currency: "TZS".to_string(),
            status,
            due_date: None,
            paid_date: None,
            description: None,
            invoice_number: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn followup(
        id: i32,
        status: FollowupStatus,
        scheduled_date: NaiveDateTime,
        created_at: NaiveDateTime,
    ) -> Followup {
        Followup {
            id: FollowupId::new(id).unwrap(),
            user_id: UserId::new("u").unwrap(),
            customer_id: CustomerId::new(1).unwrap(),
            payment_id: None,
            followup_type: FollowupType::GeneralFollowup,
            status,
            scheduled_date,
            completed_date: None,
            message: String::new(),
            method: FollowupMethod::Sms,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn empty_input_yields_zeroed_report() {
        let stats = DashboardStats::compute(&[], &[], &[], at(15, 12));
        assert_eq!(stats.customers, CustomerStats::default());
        assert_eq!(stats.payments, PaymentStats::default());
        assert_eq!(stats.followups.completion_rate, 0.0);
        assert!(stats.recent_activity.is_empty());
    }

    #[test]
    fn recent_customers_use_a_thirty_day_window() {
        let now = at(31, 12);
        let customers = vec![
            customer(1, now - Duration::days(45)),
            customer(2, now - Duration::days(30)),
            customer(3, now - Duration::days(29)),
            customer(4, now),
        ];
        let stats = DashboardStats::compute(&customers, &[], &[], now);
        assert_eq!(stats.customers.total, 4);
        // Exactly thirty days old is outside the window.
        assert_eq!(stats.customers.recent, 2);
    }

    #[test]
    fn payments_are_counted_and_summed_per_status() {
        let now = at(15, 12);
        let payments = vec![
            payment(1, 1000.0, PaymentStatus::Paid, now),
            payment(2, 2500.0, PaymentStatus::Paid, now),
            payment(3, 400.0, PaymentStatus::Overdue, now),
            payment(4, 50.0, PaymentStatus::Pending, now),
            payment(5, 75.0, PaymentStatus::Cancelled, now),
        ];
        let stats = DashboardStats::compute(&[], &payments, &[], now).payments;
        assert_eq!(stats.total, 5);
        assert_eq!(stats.total_amount, 4025.0);
        assert_eq!((stats.paid, stats.paid_amount), (2, 3500.0));
        assert_eq!((stats.overdue, stats.overdue_amount), (1, 400.0));
        assert_eq!((stats.pending, stats.pending_amount), (1, 50.0));
    }

    #[test]
    fn followup_overdue_only_counts_scheduled_in_the_past() {
        let now = at(15, 12);
        let followups = vec![
            followup(1, FollowupStatus::Scheduled, at(10, 9), now),
            followup(2, FollowupStatus::Scheduled, at(20, 9), now),
            followup(3, FollowupStatus::Sent, at(1, 9), now),
            followup(4, FollowupStatus::Completed, at(2, 9), now),
        ];
        let stats = DashboardStats::compute(&[], &[], &followups, now).followups;
        assert_eq!(stats.total, 4);
        assert_eq!(stats.scheduled, 2);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.completion_rate, 25.0);
    }

    #[test]
    fn activity_takes_three_newest_per_kind_sorted_descending() {
        let now = at(28, 12);
        let customers: Vec<_> = (1..=5).map(|i| customer(i, at(i as u32, 8))).collect();
        let payments = vec![payment(1, 1_250_000.0, PaymentStatus::Paid, at(6, 8))];
        let followups = vec![followup(1, FollowupStatus::Sent, now, at(3, 20))];

        let activity = DashboardStats::compute(&customers, &payments, &followups, now).recent_activity;

        let ids: Vec<_> = activity.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["payment-1", "customer-5", "customer-4", "followup-1", "customer-3"]
        );
        assert_eq!(activity[0].description, "Payment paid - TSh 1,250,000");
        assert_eq!(activity[3].description, "Follow-up sent");
        assert_eq!(activity[1].kind, ActivityKind::Customer);
    }

    #[test]
    fn activity_holds_at_most_three_per_kind() {
        let now = at(28, 12);
        let customers: Vec<_> = (1..=4).map(|i| customer(i, at(i as u32, 1))).collect();
        let payments: Vec<_> = (1..=4)
            .map(|i| payment(i, 1.0, PaymentStatus::Pending, at(i as u32, 2)))
            .collect();
        let followups: Vec<_> = (1..=4)
            .map(|i| followup(i, FollowupStatus::Scheduled, now, at(i as u32, 3)))
            .collect();

        let activity = DashboardStats::compute(&customers, &payments, &followups, now).recent_activity;
        assert_eq!(activity.len(), 9);
        assert!(activity.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let stats = DashboardStats::compute(&[], &[], &[], at(1, 0));
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("recentActivity").is_some());
        assert!(json["payments"].get("totalAmount").is_some());
        assert!(json["followups"].get("completionRate").is_some());
    }

    #[test]
    fn formats_shillings_with_grouping() {
        assert_eq!(format_tsh(0.0), "TSh 0");
        assert_eq!(format_tsh(999.0), "TSh 999");
        assert_eq!(format_tsh(1000.0), "TSh 1,000");
        assert_eq!(format_tsh(1234567.6), "TSh 1,234,568");
    }
}
