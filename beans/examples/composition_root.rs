//! A small member/order application wired by one composition root.
//!
//! Run with `RUST_LOG=fibre_beans=debug` to watch the container register and
//! construct each service.

use fibre_beans::{Beans, Container, ContainerBuilder, IocError, Role, ServiceDefinition};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grade {
  Basic,
  Vip,
}

#[derive(Debug, Clone)]
struct Member {
  id: u64,
  name: String,
  grade: Grade,
}

// --- Repository ---

trait MemberRepository: Send + Sync {
  fn save(&self, member: Member);
  fn find_by_id(&self, id: u64) -> Option<Member>;
}

#[derive(Default)]
struct MemoryMemberRepository {
  store: RwLock<HashMap<u64, Member>>,
}

impl MemberRepository for MemoryMemberRepository {
  fn save(&self, member: Member) {
    if let Ok(mut store) = self.store.write() {
      store.insert(member.id, member);
    }
  }

  fn find_by_id(&self, id: u64) -> Option<Member> {
    self.store.read().ok()?.get(&id).cloned()
  }
}

// --- Discount policies ---

trait DiscountPolicy: Send + Sync {
  fn discount(&self, member: &Member, price: u32) -> u32;
}

struct FixDiscountPolicy;
impl DiscountPolicy for FixDiscountPolicy {
  fn discount(&self, member: &Member, _price: u32) -> u32 {
    if member.grade == Grade::Vip {
      1000
    } else {
      0
    }
  }
}

struct RateDiscountPolicy;
impl DiscountPolicy for RateDiscountPolicy {
  fn discount(&self, member: &Member, price: u32) -> u32 {
    if member.grade == Grade::Vip {
      price / 10
    } else {
      0
    }
  }
}

// --- Services ---

struct OrderService {
  repository: Arc<dyn MemberRepository>,
  policy: Arc<dyn DiscountPolicy>,
}

impl OrderService {
  fn order(&self, member_id: u64, item: &str, price: u32) -> Option<String> {
    let member = self.repository.find_by_id(member_id)?;
    let discount = self.policy.discount(&member, price);
    Some(format!("{} ordered {} for {} (discount {})", member.name, item, price, discount))
  }
}

/// Keeps every policy and lets the caller pick one per request.
struct DiscountService {
  policies: Beans<dyn DiscountPolicy>,
}

impl DiscountService {
  fn discount(&self, member: &Member, price: u32, policy: &str) -> Option<u32> {
    self.policies.get(policy).map(|p| p.discount(member, price))
  }
}

struct AuditSettings {
  enabled: bool,
}

fn app_config(builder: &mut ContainerBuilder) -> Result<(), IocError> {
  builder
    .register(
      ServiceDefinition::of::<MemoryMemberRepository>("memberRepository")
        .exposes::<dyn MemberRepository>(|r| r)
        .factory(|_| Ok(MemoryMemberRepository::default())),
    )?
    .register(
      ServiceDefinition::of::<FixDiscountPolicy>("fixDiscountPolicy")
        .exposes::<dyn DiscountPolicy>(|p| p)
        .factory(|_| Ok(FixDiscountPolicy)),
    )?
    .register(
      ServiceDefinition::of::<RateDiscountPolicy>("rateDiscountPolicy")
        .exposes::<dyn DiscountPolicy>(|p| p)
        .primary()
        .factory(|_| Ok(RateDiscountPolicy)),
    )?
    .register(
      ServiceDefinition::of::<OrderService>("orderService")
        .depends_on::<dyn MemberRepository>()
        .depends_on::<dyn DiscountPolicy>()
        .factory(|deps| {
          Ok(OrderService {
            repository: deps.next::<dyn MemberRepository>()?,
            policy: deps.next::<dyn DiscountPolicy>()?,
          })
        }),
    )?
    .register(
      ServiceDefinition::of::<DiscountService>("discountService")
        .depends_on_all::<dyn DiscountPolicy>()
        .factory(|deps| {
          Ok(DiscountService {
            policies: deps.next_all::<dyn DiscountPolicy>()?,
          })
        }),
    )?
    .register(
      ServiceDefinition::of::<AuditSettings>("auditSettings")
        .role(Role::Infrastructure)
        .description("audit trail settings")
        .instance(AuditSettings { enabled: true }),
    )?
    .eager(true);
  Ok(())
}

fn main() -> Result<(), IocError> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let mut builder = Container::builder();
  app_config(&mut builder)?;
  let container = builder.build()?;

  let repository = container.get_by_type::<dyn MemberRepository>()?;
  repository.save(Member {
    id: 1,
    name: "memberA".to_string(),
    grade: Grade::Vip,
  });

  // The primary rate policy is injected into the order service.
  let orders = container.get_by_type::<OrderService>()?;
  if let Some(receipt) = orders.order(1, "itemA", 20000) {
    println!("{}", receipt);
  }

  // The discount service chooses a policy at runtime.
  let discounts = container.get_by_type::<DiscountService>()?;
  if let Some(member) = repository.find_by_id(1) {
    for name in ["fixDiscountPolicy", "rateDiscountPolicy"] {
      println!("{} -> {:?}", name, discounts.discount(&member, 20000, name));
    }
  }

  let audit = container.get_by_type::<AuditSettings>()?;
  println!("\nAudit enabled: {}", audit.enabled);

  println!("\nApplication definitions:");
  for name in container.definition_names_with_role(Role::Application) {
    println!("  {}", container.definition(name)?);
  }
  Ok(())
}
