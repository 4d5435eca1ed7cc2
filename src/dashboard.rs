//! Sample tenant and admin consoles, rendered as plain text after sign-in.

use chrono::NaiveDate;

use crate::auth::Route;
use crate::data::{self, DataLibrary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotStatus {
    Published,
    Draft,
}

#[derive(Debug, Clone)]
pub struct ChatbotSummary {
    pub name: &'static str,
    pub status: BotStatus,
    pub conversations: u32,
    pub users: u32,
    pub last_active: &'static str,
    /// Percent.
    pub performance: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantStatus {
    Active,
    Inactive,
    Trial,
}

impl TenantStatus {
    fn as_str(self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Inactive => "inactive",
            TenantStatus::Trial => "trial",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tenant {
    pub name: &'static str,
    pub email: &'static str,
    pub status: TenantStatus,
    pub chatbots: u32,
    pub created_at: NaiveDate,
}

pub fn sample_chatbots() -> Vec<ChatbotSummary> {
    vec![
        ChatbotSummary {
            name: "Customer Support Bot",
            status: BotStatus::Published,
            conversations: 1284,
            users: 842,
            last_active: "2 hours ago",
            performance: 94,
        },
        ChatbotSummary {
            name: "Sales Assistant",
            status: BotStatus::Published,
            conversations: 856,
            users: 523,
            last_active: "5 minutes ago",
            performance: 87,
        },
        ChatbotSummary {
            name: "FAQ Helper",
            status: BotStatus::Draft,
            conversations: 0,
            users: 0,
            last_active: "Never",
            performance: 0,
        },
        ChatbotSummary {
            name: "Product Advisor",
            status: BotStatus::Published,
            conversations: 432,
            users: 298,
            last_active: "1 day ago",
            performance: 91,
        },
    ]
}

pub fn sample_tenants() -> Vec<Tenant> {
    let tenant = |name, email, status, chatbots, (y, m, d): (i32, u32, u32)| Tenant {
        name,
        email,
        status,
        chatbots,
        created_at: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
    };
    vec![
        tenant("Acme Inc", "admin@acmeinc.com", TenantStatus::Active, 3, (2023, 4, 12)),
        tenant("TechCorp", "support@techcorp.com", TenantStatus::Active, 2, (2023, 5, 18)),
        tenant("Global Solutions", "info@globalsolutions.com", TenantStatus::Inactive, 1, (2023, 6, 24)),
        tenant("Startup Labs", "hello@startuplabs.com", TenantStatus::Active, 4, (2023, 7, 30)),
        tenant("Digital Innovations", "contact@digitalinnovations.com", TenantStatus::Trial, 1, (2023, 8, 15)),
        tenant("Future Tech", "support@futuretech.com", TenantStatus::Active, 2, (2023, 9, 5)),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantOverview {
    pub active_chatbots: usize,
    pub total_conversations: u32,
    pub unique_users: u32,
}

impl TenantOverview {
    pub fn from_chatbots(bots: &[ChatbotSummary]) -> Self {
        Self {
            active_chatbots: bots.iter().filter(|b| b.status == BotStatus::Published).count(),
            total_conversations: bots.iter().map(|b| b.conversations).sum(),
            unique_users: bots.iter().map(|b| b.users).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminOverview {
    pub tenants: usize,
    pub active: usize,
    pub trial: usize,
    pub inactive: usize,
    pub total_chatbots: u32,
}

impl AdminOverview {
    pub fn from_tenants(tenants: &[Tenant]) -> Self {
        let count = |status| tenants.iter().filter(|t| t.status == status).count();
        Self {
            tenants: tenants.len(),
            active: count(TenantStatus::Active),
            trial: count(TenantStatus::Trial),
            inactive: count(TenantStatus::Inactive),
            total_chatbots: tenants.iter().map(|t| t.chatbots).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone)]
pub struct PlatformUser {
    pub name: &'static str,
    pub email: &'static str,
    pub role: UserRole,
    pub tenant: &'static str,
    pub status: UserStatus,
    pub last_login: NaiveDate,
}

pub fn sample_users() -> Vec<PlatformUser> {
    let user = |name, email, role, tenant, status, (y, m, d): (i32, u32, u32)| PlatformUser {
        name,
        email,
        role,
        tenant,
        status,
        last_login: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
    };
    vec![
        user("John Smith", "john@acmeinc.com", UserRole::Admin, "Acme Inc", UserStatus::Active, (2023, 9, 12)),
        user("Sarah Johnson", "sarah@techcorp.com", UserRole::User, "TechCorp", UserStatus::Active, (2023, 9, 15)),
        user("Michael Brown", "michael@globalsolutions.com", UserRole::User, "Global Solutions", UserStatus::Inactive, (2023, 8, 24)),
        user("Emily Davis", "emily@startuplabs.com", UserRole::Admin, "Startup Labs", UserStatus::Active, (2023, 9, 18)),
        user("David Wilson", "david@digitalinnovations.com", UserRole::User, "Digital Innovations", UserStatus::Active, (2023, 9, 10)),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOverview {
    pub users: usize,
    pub admins: usize,
    pub active: usize,
    pub inactive: usize,
}

impl UserOverview {
    pub fn from_users(users: &[PlatformUser]) -> Self {
        let active = users.iter().filter(|u| u.status == UserStatus::Active).count();
        Self {
            users: users.len(),
            admins: users.iter().filter(|u| u.role == UserRole::Admin).count(),
            active,
            inactive: users.len() - active,
        }
    }
}

pub fn render(route: Route) -> String {
    match route {
        Route::Dashboard => render_tenant(&sample_chatbots(), &DataLibrary::sample()),
        Route::AdminDashboard => render_admin(&sample_tenants(), &sample_users()),
    }
}

fn render_tenant(bots: &[ChatbotSummary], library: &DataLibrary) -> String {
    let overview = TenantOverview::from_chatbots(bots);
    let mut lines = vec![
        "Dashboard".to_string(),
        format!("  Active Chatbots      {}", overview.active_chatbots),
        format!("  Total Conversations  {}", thousands(overview.total_conversations)),
        format!("  Unique Users         {}", thousands(overview.unique_users)),
        String::new(),
        format!(
            "  {:<22} {:<10} {:>13} {:>6} {:>6}  {}",
            "Chatbot", "Status", "Conversations", "Users", "Perf", "Last active"
        ),
    ];
    for bot in bots {
        let status = match bot.status {
            BotStatus::Published => "published",
            BotStatus::Draft => "draft",
        };
        lines.push(format!(
            "  {:<22} {:<10} {:>13} {:>6} {:>5}%  {}",
            bot.name,
            status,
            thousands(bot.conversations),
            thousands(bot.users),
            bot.performance,
            bot.last_active
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Data Sources ({} entries)",
        thousands(library.total_entries())
    ));
    lines.push(data::render_sources(library.sources()));
    lines.join("\n")
}

fn render_admin(tenants: &[Tenant], users: &[PlatformUser]) -> String {
    let overview = AdminOverview::from_tenants(tenants);
    let mut lines = vec![
        "Admin Dashboard".to_string(),
        format!(
            "  Tenants {} ({} active, {} trial, {} inactive), {} chatbots",
            overview.tenants, overview.active, overview.trial, overview.inactive, overview.total_chatbots
        ),
        String::new(),
        format!(
            "  {:<20} {:<32} {:<9} {:>8}  {}",
            "Tenant", "Email", "Status", "Chatbots", "Created"
        ),
    ];
    lines.extend(tenants.iter().map(|t| {
        format!(
            "  {:<20} {:<32} {:<9} {:>8}  {}",
            t.name,
            t.email,
            t.status.as_str(),
            t.chatbots,
            t.created_at.format("%b %-d, %Y")
        )
    }));

    let people = UserOverview::from_users(users);
    lines.push(String::new());
    lines.push(format!(
        "Users {} ({} admins, {} active, {} inactive)",
        people.users, people.admins, people.active, people.inactive
    ));
    lines.push(format!(
        "  {:<15} {:<30} {:<6} {:<20} {:<9} {}",
        "Name", "Email", "Role", "Tenant", "Status", "Last login"
    ));
    for u in users {
        let role = match u.role {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        };
        let status = match u.status {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        };
        lines.push(format!(
            "  {:<15} {:<30} {:<6} {:<20} {:<9} {}",
            u.name,
            u.email,
            role,
            u.tenant,
            status,
            u.last_login.format("%b %-d, %Y")
        ));
    }
    lines.join("\n")
}

fn thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_overview() {
        let overview = TenantOverview::from_chatbots(&sample_chatbots());
        assert_eq!(overview.active_chatbots, 3);
        assert_eq!(overview.total_conversations, 2572);
        assert_eq!(overview.unique_users, 1663);
    }

    #[test]
    fn test_admin_overview() {
        let overview = AdminOverview::from_tenants(&sample_tenants());
        assert_eq!(
            overview,
            AdminOverview {
                tenants: 6,
                active: 4,
                trial: 1,
                inactive: 1,
                total_chatbots: 13,
            }
        );
    }

    #[test]
    fn test_render_by_route() {
        let tenant = render(Route::Dashboard);
        assert!(tenant.starts_with("Dashboard"));
        assert!(tenant.contains("2,572"));
        assert!(tenant.contains("FAQ Helper"));

        assert!(tenant.contains("Data Sources (49 entries)"));
        assert!(tenant.contains("Company Handbook.pdf"));

        let admin = render(Route::AdminDashboard);
        assert!(admin.starts_with("Admin Dashboard"));
        assert!(admin.contains("Apr 12, 2023"));
        assert!(admin.contains("Users 5 (2 admins, 4 active, 1 inactive)"));
        assert!(admin.contains("michael@globalsolutions.com"));
        assert!(!admin.ends_with('\n'));
    }

    #[test]
    fn test_user_overview() {
        let overview = UserOverview::from_users(&sample_users());
        assert_eq!(
            overview,
            UserOverview {
                users: 5,
                admins: 2,
                active: 4,
                inactive: 1,
            }
        );
        assert_eq!(UserOverview::from_users(&[]).inactive, 0);
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1284), "1,284");
        assert_eq!(thousands(1234567), "1,234,567");
    }
}
