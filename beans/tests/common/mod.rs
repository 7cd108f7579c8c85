// Shared domain fixtures: members, discount policies and orders.
// Not every test binary uses every fixture.
#![allow(dead_code)]

use dashmap::DashMap;
use fibre_beans::{ContainerBuilder, IocError, ServiceDefinition};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
  Basic,
  Vip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
  pub id: u64,
  pub name: String,
  pub grade: Grade,
}

impl Member {
  pub fn new(id: u64, name: &str, grade: Grade) -> Self {
    Self {
      id,
      name: name.to_owned(),
      grade,
    }
  }
}

pub trait MemberRepository: Send + Sync {
  fn save(&self, member: Member);
  fn find_by_id(&self, id: u64) -> Option<Member>;
}

/// Each instance owns its own store, so separate containers never share members.
#[derive(Default)]
pub struct MemoryMemberRepository {
  store: DashMap<u64, Member>,
}

impl MemberRepository for MemoryMemberRepository {
  fn save(&self, member: Member) {
    self.store.insert(member.id, member);
  }

  fn find_by_id(&self, id: u64) -> Option<Member> {
    self.store.get(&id).map(|m| m.value().clone())
  }
}

pub trait MemberService: Send + Sync {
  fn join(&self, member: Member);
  fn find_member(&self, id: u64) -> Option<Member>;
}

pub struct MemberServiceImpl {
  pub repository: Arc<dyn MemberRepository>,
}

impl MemberService for MemberServiceImpl {
  fn join(&self, member: Member) {
    self.repository.save(member);
  }

  fn find_member(&self, id: u64) -> Option<Member> {
    self.repository.find_by_id(id)
  }
}

pub trait DiscountPolicy: Send + Sync {
  fn discount(&self, member: &Member, price: u32) -> u32;
}

pub struct FixDiscountPolicy;

impl DiscountPolicy for FixDiscountPolicy {
  fn discount(&self, member: &Member, _price: u32) -> u32 {
    match member.grade {
      Grade::Vip => 1000,
      Grade::Basic => 0,
    }
  }
}

pub struct RateDiscountPolicy;

impl DiscountPolicy for RateDiscountPolicy {
  fn discount(&self, member: &Member, price: u32) -> u32 {
    match member.grade {
      Grade::Vip => price / 10,
      Grade::Basic => 0,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
  pub member_id: u64,
  pub item_name: String,
  pub item_price: u32,
  pub discount_price: u32,
}

pub struct OrderService {
  pub repository: Arc<dyn MemberRepository>,
  pub policy: Arc<dyn DiscountPolicy>,
}

impl OrderService {
  pub fn create(&self, member_id: u64, item_name: &str, item_price: u32) -> Option<Order> {
    let member = self.repository.find_by_id(member_id)?;
    Some(Order {
      member_id,
      item_name: item_name.to_owned(),
      item_price,
      discount_price: self.policy.discount(&member, item_price),
    })
  }
}

pub fn fix_discount(name: &str) -> ServiceDefinition {
  ServiceDefinition::of::<FixDiscountPolicy>(name)
    .exposes::<dyn DiscountPolicy>(|p| p)
    .factory(|_| Ok(FixDiscountPolicy))
}

pub fn rate_discount(name: &str, primary: bool) -> ServiceDefinition {
  let definition = ServiceDefinition::of::<RateDiscountPolicy>(name).exposes::<dyn DiscountPolicy>(|p| p);
  let definition = if primary { definition.primary() } else { definition };
  definition.factory(|_| Ok(RateDiscountPolicy))
}

/// The hand-written composition root for the member/order application.
pub fn app_config(builder: &mut ContainerBuilder) -> Result<(), IocError> {
  builder
    .register(
      ServiceDefinition::of::<MemoryMemberRepository>("memberRepository")
        .exposes::<dyn MemberRepository>(|r| r)
        .factory(|_| Ok(MemoryMemberRepository::default())),
    )?
    .register(
      ServiceDefinition::of::<MemberServiceImpl>("memberService")
        .exposes::<dyn MemberService>(|s| s)
        .depends_on::<dyn MemberRepository>()
        .factory(|deps| {
          Ok(MemberServiceImpl {
            repository: deps.next::<dyn MemberRepository>()?,
          })
        }),
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
    .register(rate_discount("discountPolicy", false))?;
  Ok(())
}
