//! In-memory reference engine
//!
//! Implements every repository contract over one `RwLock`-guarded table set.
//! All rows live behind a single lock, so each repository call is one atomic
//! unit: reservation create/update re-verify room availability under the
//! write lock, which is the serializability guarantee real backends must
//! provide with a transaction or an exclusion constraint.
//!
//! Soft-deleted rows stay in the tables with a deletion stamp and are
//! invisible to every query; audit entries are plain appends and are never
//! touched again.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use parking_lot::RwLock;

use crate::audit::{AuditLog, AuditLogFilter};
use crate::models::{
    DateBlock, PaymentMethod, Reservation, Room, RoomGroup, RoomStatus, UserSummary,
};

use super::{
    AuditLogRepository, DateBlockRepository, PaymentMethodRepository, RepoError, RepoResult,
    ReservationFilter, ReservationRepository, RoomFilter, RoomGroupRepository, RoomRepository,
    StatPoint, StatisticsPeriod, UserDirectory,
};

/// Row wrapper carrying the soft-deletion stamp
#[derive(Debug, Clone)]
struct Soft<T> {
    row: T,
    deleted_at: Option<DateTime<Utc>>,
}

impl<T> Soft<T> {
    fn alive(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Default)]
struct Tables {
    next_id: u64,
    next_audit_id: u64,
    room_groups: BTreeMap<u64, Soft<RoomGroup>>,
    rooms: BTreeMap<u64, Soft<Room>>,
    payment_methods: BTreeMap<u64, Soft<PaymentMethod>>,
    date_blocks: BTreeMap<u64, Soft<DateBlock>>,
    reservations: BTreeMap<u64, Soft<Reservation>>,
    audit_logs: Vec<AuditLog>,
    users: BTreeMap<u64, UserSummary>,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn group_name_taken(&self, name: &str, exclude: Option<u64>) -> bool {
        self.room_groups
            .values()
            .filter(|g| g.alive())
            .filter(|g| Some(g.row.id) != exclude)
            .any(|g| g.row.name == name)
    }

    fn room_number_taken(&self, number: &str, exclude: Option<u64>) -> bool {
        self.rooms
            .values()
            .filter(|r| r.alive())
            .filter(|r| Some(r.row.id) != exclude)
            .any(|r| r.row.number == number)
    }

    fn method_name_taken(&self, name: &str, exclude: Option<u64>) -> bool {
        self.payment_methods
            .values()
            .filter(|m| m.alive())
            .filter(|m| Some(m.row.id) != exclude)
            .any(|m| m.row.name == name)
    }

    /// Whether any other active reservation occupies the room over `[start, end)`
    fn room_occupied(
        &self,
        room_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation: Option<u64>,
    ) -> bool {
        self.reservations
            .values()
            .filter(|r| r.alive())
            .filter(|r| Some(r.row.id) != exclude_reservation)
            .any(|r| r.row.occupies(room_id, start, end))
    }
}

/// Reference implementation backing the tests; share it via `Arc` and hand
/// clones of that `Arc` to each service as its repository
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Seed the user directory (history reconstruction lookups)
    pub fn put_user(&self, user: UserSummary) {
        self.tables.write().users.insert(user.id, user);
    }
}

fn paginate<T: Clone>(items: &[T], page: usize, size: usize) -> Vec<T> {
    items.iter().skip(page * size).take(size).cloned().collect()
}

// ========== Room groups ==========

#[async_trait]
impl RoomGroupRepository for MemoryStore {
    async fn create(&self, mut group: RoomGroup) -> RepoResult<RoomGroup> {
        let mut t = self.tables.write();
        if t.group_name_taken(&group.name, None) {
            return Err(RepoError::Duplicate(format!("room_group name:{}", group.name)));
        }
        group.id = t.next_id();
        group.created_at = Utc::now();
        group.updated_at = group.created_at;
        t.room_groups.insert(
            group.id,
            Soft {
                row: group.clone(),
                deleted_at: None,
            },
        );
        Ok(group)
    }

    async fn update(&self, mut group: RoomGroup) -> RepoResult<RoomGroup> {
        let mut t = self.tables.write();
        if t.group_name_taken(&group.name, Some(group.id)) {
            return Err(RepoError::Duplicate(format!("room_group name:{}", group.name)));
        }
        let entry = t
            .room_groups
            .get_mut(&group.id)
            .filter(|g| g.alive())
            .ok_or_else(|| RepoError::NotFound(format!("room_group:{}", group.id)))?;
        group.updated_at = Utc::now();
        entry.row = group.clone();
        Ok(group)
    }

    async fn delete(&self, id: u64, actor: u64) -> RepoResult<()> {
        let mut t = self.tables.write();
        let entry = t
            .room_groups
            .get_mut(&id)
            .filter(|g| g.alive())
            .ok_or_else(|| RepoError::NotFound(format!("room_group:{id}")))?;
        entry.row.updated_by = actor;
        entry.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn find_by_id(&self, id: u64) -> RepoResult<Option<RoomGroup>> {
        let t = self.tables.read();
        Ok(t.room_groups
            .get(&id)
            .filter(|g| g.alive())
            .map(|g| g.row.clone()))
    }

    async fn find_all(&self, page: usize, size: usize) -> RepoResult<(Vec<RoomGroup>, u64)> {
        let t = self.tables.read();
        let mut groups: Vec<RoomGroup> = t
            .room_groups
            .values()
            .filter(|g| g.alive())
            .map(|g| g.row.clone())
            .collect();
        groups.sort_by(|a, b| b.id.cmp(&a.id));
        let total = groups.len() as u64;
        Ok((paginate(&groups, page, size), total))
    }

    async fn exists_by_name(&self, name: &str, exclude_id: Option<u64>) -> RepoResult<bool> {
        let t = self.tables.read();
        Ok(t.group_name_taken(name, exclude_id))
    }
}

// ========== Rooms ==========

#[async_trait]
impl RoomRepository for MemoryStore {
    async fn create(&self, mut room: Room) -> RepoResult<Room> {
        let mut t = self.tables.write();
        if t.room_number_taken(&room.number, None) {
            return Err(RepoError::Duplicate(format!("room number:{}", room.number)));
        }
        room.id = t.next_id();
        room.created_at = Utc::now();
        room.updated_at = room.created_at;
        t.rooms.insert(
            room.id,
            Soft {
                row: room.clone(),
                deleted_at: None,
            },
        );
        Ok(room)
    }

    async fn update(&self, mut room: Room) -> RepoResult<Room> {
        let mut t = self.tables.write();
        if t.room_number_taken(&room.number, Some(room.id)) {
            return Err(RepoError::Duplicate(format!("room number:{}", room.number)));
        }
        let entry = t
            .rooms
            .get_mut(&room.id)
            .filter(|r| r.alive())
            .ok_or_else(|| RepoError::NotFound(format!("room:{}", room.id)))?;
        room.updated_at = Utc::now();
        entry.row = room.clone();
        Ok(room)
    }

    async fn delete(&self, id: u64, actor: u64) -> RepoResult<()> {
        let mut t = self.tables.write();
        let entry = t
            .rooms
            .get_mut(&id)
            .filter(|r| r.alive())
            .ok_or_else(|| RepoError::NotFound(format!("room:{id}")))?;
        entry.row.updated_by = actor;
        entry.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn find_by_id(&self, id: u64) -> RepoResult<Option<Room>> {
        let t = self.tables.read();
        Ok(t.rooms
            .get(&id)
            .filter(|r| r.alive())
            .map(|r| r.row.clone()))
    }

    async fn find_all(
        &self,
        filter: RoomFilter,
        page: usize,
        size: usize,
    ) -> RepoResult<(Vec<Room>, u64)> {
        let t = self.tables.read();
        let mut rooms: Vec<Room> = t
            .rooms
            .values()
            .filter(|r| r.alive())
            .map(|r| &r.row)
            .filter(|r| {
                filter
                    .room_group_id
                    .is_none_or(|gid| r.room_group_id == gid)
            })
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .filter(|r| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|q| r.number.contains(q))
            })
            .cloned()
            .collect();
        rooms.sort_by(|a, b| b.id.cmp(&a.id));
        let total = rooms.len() as u64;
        Ok((paginate(&rooms, page, size), total))
    }

    async fn exists_by_number(&self, number: &str, exclude_id: Option<u64>) -> RepoResult<bool> {
        let t = self.tables.read();
        Ok(t.room_number_taken(number, exclude_id))
    }

    async fn count_by_group(&self, room_group_id: u64) -> RepoResult<u64> {
        let t = self.tables.read();
        Ok(t.rooms
            .values()
            .filter(|r| r.alive() && r.row.room_group_id == room_group_id)
            .count() as u64)
    }

    async fn is_room_available(
        &self,
        room_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation: Option<u64>,
    ) -> RepoResult<bool> {
        let t = self.tables.read();
        Ok(!t.room_occupied(room_id, start, end, exclude_reservation))
    }

    async fn find_available_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation: Option<u64>,
    ) -> RepoResult<Vec<Room>> {
        let t = self.tables.read();
        let mut rooms: Vec<Room> = t
            .rooms
            .values()
            .filter(|r| r.alive() && r.row.status == RoomStatus::Normal)
            .filter(|r| !t.room_occupied(r.row.id, start, end, exclude_reservation))
            .map(|r| r.row.clone())
            .collect();
        rooms.sort_by(|a, b| {
            (a.room_group_id, a.number.as_str()).cmp(&(b.room_group_id, b.number.as_str()))
        });
        Ok(rooms)
    }

    async fn has_active_reservations(&self, room_id: u64) -> RepoResult<bool> {
        let t = self.tables.read();
        Ok(t.reservations
            .values()
            .filter(|r| r.alive() && !r.row.is_canceled())
            .any(|r| r.row.rooms.iter().any(|rr| rr.room_id == room_id)))
    }
}

// ========== Payment methods ==========

#[async_trait]
impl PaymentMethodRepository for MemoryStore {
    async fn create(&self, mut method: PaymentMethod) -> RepoResult<PaymentMethod> {
        let mut t = self.tables.write();
        if t.method_name_taken(&method.name, None) {
            return Err(RepoError::Duplicate(format!(
                "payment_method name:{}",
                method.name
            )));
        }
        method.id = t.next_id();
        method.created_at = Utc::now();
        method.updated_at = method.created_at;
        t.payment_methods.insert(
            method.id,
            Soft {
                row: method.clone(),
                deleted_at: None,
            },
        );
        Ok(method)
    }

    async fn update(&self, mut method: PaymentMethod) -> RepoResult<PaymentMethod> {
        let mut t = self.tables.write();
        if t.method_name_taken(&method.name, Some(method.id)) {
            return Err(RepoError::Duplicate(format!(
                "payment_method name:{}",
                method.name
            )));
        }
        let entry = t
            .payment_methods
            .get_mut(&method.id)
            .filter(|m| m.alive())
            .ok_or_else(|| RepoError::NotFound(format!("payment_method:{}", method.id)))?;
        method.updated_at = Utc::now();
        entry.row = method.clone();
        Ok(method)
    }

    async fn delete(&self, id: u64) -> RepoResult<()> {
        let mut t = self.tables.write();
        let entry = t
            .payment_methods
            .get_mut(&id)
            .filter(|m| m.alive())
            .ok_or_else(|| RepoError::NotFound(format!("payment_method:{id}")))?;
        entry.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn find_by_id(&self, id: u64) -> RepoResult<Option<PaymentMethod>> {
        let t = self.tables.read();
        Ok(t.payment_methods
            .get(&id)
            .filter(|m| m.alive())
            .map(|m| m.row.clone()))
    }

    async fn find_all(&self, page: usize, size: usize) -> RepoResult<(Vec<PaymentMethod>, u64)> {
        let t = self.tables.read();
        let mut methods: Vec<PaymentMethod> = t
            .payment_methods
            .values()
            .filter(|m| m.alive())
            .map(|m| m.row.clone())
            .collect();
        methods.sort_by(|a, b| b.id.cmp(&a.id));
        let total = methods.len() as u64;
        Ok((paginate(&methods, page, size), total))
    }

    async fn find_active(&self) -> RepoResult<Vec<PaymentMethod>> {
        let t = self.tables.read();
        let mut methods: Vec<PaymentMethod> = t
            .payment_methods
            .values()
            .filter(|m| m.alive() && m.row.is_active())
            .map(|m| m.row.clone())
            .collect();
        methods.sort_by_key(|m| m.id);
        Ok(methods)
    }

    async fn exists_by_name(&self, name: &str, exclude_id: Option<u64>) -> RepoResult<bool> {
        let t = self.tables.read();
        Ok(t.method_name_taken(name, exclude_id))
    }

    async fn make_default(&self, id: u64) -> RepoResult<()> {
        // Reset-all-then-set-one under one write lock: no window with zero
        // or two defaults
        let mut t = self.tables.write();
        if !t.payment_methods.get(&id).is_some_and(|m| m.alive()) {
            return Err(RepoError::NotFound(format!("payment_method:{id}")));
        }
        for entry in t.payment_methods.values_mut().filter(|m| m.alive()) {
            entry.row.is_default_select = entry.row.id == id;
        }
        Ok(())
    }

    async fn referenced_by_reservations(&self, id: u64) -> RepoResult<bool> {
        let t = self.tables.read();
        Ok(t.reservations
            .values()
            .filter(|r| r.alive())
            .any(|r| r.row.payment_method_id == id))
    }
}

// ========== Date blocks ==========

#[async_trait]
impl DateBlockRepository for MemoryStore {
    async fn create(&self, mut block: DateBlock) -> RepoResult<DateBlock> {
        let mut t = self.tables.write();
        block.id = t.next_id();
        block.created_at = Utc::now();
        block.updated_at = block.created_at;
        t.date_blocks.insert(
            block.id,
            Soft {
                row: block.clone(),
                deleted_at: None,
            },
        );
        Ok(block)
    }

    async fn update(&self, mut block: DateBlock) -> RepoResult<DateBlock> {
        let mut t = self.tables.write();
        let entry = t
            .date_blocks
            .get_mut(&block.id)
            .filter(|b| b.alive())
            .ok_or_else(|| RepoError::NotFound(format!("date_block:{}", block.id)))?;
        block.updated_at = Utc::now();
        entry.row = block.clone();
        Ok(block)
    }

    async fn delete(&self, id: u64, actor: u64) -> RepoResult<()> {
        let mut t = self.tables.write();
        let entry = t
            .date_blocks
            .get_mut(&id)
            .filter(|b| b.alive())
            .ok_or_else(|| RepoError::NotFound(format!("date_block:{id}")))?;
        entry.row.updated_by = actor;
        entry.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn find_by_id(&self, id: u64) -> RepoResult<Option<DateBlock>> {
        let t = self.tables.read();
        Ok(t.date_blocks
            .get(&id)
            .filter(|b| b.alive())
            .map(|b| b.row.clone()))
    }

    async fn find_all(&self, page: usize, size: usize) -> RepoResult<(Vec<DateBlock>, u64)> {
        let t = self.tables.read();
        let mut blocks: Vec<DateBlock> = t
            .date_blocks
            .values()
            .filter(|b| b.alive())
            .map(|b| b.row.clone())
            .collect();
        blocks.sort_by(|a, b| b.id.cmp(&a.id));
        let total = blocks.len() as u64;
        Ok((paginate(&blocks, page, size), total))
    }

    async fn is_date_range_blocked(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<bool> {
        let t = self.tables.read();
        Ok(t.date_blocks
            .values()
            .filter(|b| b.alive())
            .any(|b| b.row.intersects(start, end)))
    }
}

// ========== Reservations ==========

impl Tables {
    fn resolve_details(&self, mut reservation: Reservation) -> Reservation {
        reservation.payment_method = self
            .payment_methods
            .get(&reservation.payment_method_id)
            .filter(|m| m.alive())
            .map(|m| m.row.clone());
        for rr in &mut reservation.rooms {
            rr.room = self
                .rooms
                .get(&rr.room_id)
                .filter(|r| r.alive())
                .map(|r| r.row.clone());
        }
        reservation
    }
}

#[async_trait]
impl ReservationRepository for MemoryStore {
    async fn create(&self, mut reservation: Reservation) -> RepoResult<Reservation> {
        let mut t = self.tables.write();

        // Atomic re-validation: the service-level availability read may have
        // raced another writer
        for rr in &reservation.rooms {
            if t.room_occupied(
                rr.room_id,
                reservation.stay_start_at,
                reservation.stay_end_at,
                None,
            ) {
                return Err(RepoError::Conflict(format!(
                    "room:{} already booked for the requested period",
                    rr.room_id
                )));
            }
        }

        reservation.id = t.next_id();
        reservation.created_at = Utc::now();
        reservation.updated_at = reservation.created_at;
        t.reservations.insert(
            reservation.id,
            Soft {
                row: reservation.clone(),
                deleted_at: None,
            },
        );
        Ok(reservation)
    }

    async fn update(
        &self,
        mut reservation: Reservation,
        rooms_changed: bool,
    ) -> RepoResult<Reservation> {
        let mut t = self.tables.write();

        if !t
            .reservations
            .get(&reservation.id)
            .is_some_and(|r| r.alive())
        {
            return Err(RepoError::NotFound(format!(
                "reservation:{}",
                reservation.id
            )));
        }

        if rooms_changed {
            for rr in &reservation.rooms {
                if t.room_occupied(
                    rr.room_id,
                    reservation.stay_start_at,
                    reservation.stay_end_at,
                    Some(reservation.id),
                ) {
                    return Err(RepoError::Conflict(format!(
                        "room:{} already booked for the requested period",
                        rr.room_id
                    )));
                }
            }
        }

        reservation.updated_at = Utc::now();
        if let Some(entry) = t.reservations.get_mut(&reservation.id) {
            // Replacing the row replaces the assignment set: the old
            // reservation-room pairs are owned by the reservation
            entry.row = reservation.clone();
        }
        Ok(reservation)
    }

    async fn delete(&self, id: u64, actor: u64) -> RepoResult<()> {
        let mut t = self.tables.write();
        let entry = t
            .reservations
            .get_mut(&id)
            .filter(|r| r.alive())
            .ok_or_else(|| RepoError::NotFound(format!("reservation:{id}")))?;
        entry.row.updated_by = actor;
        entry.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn find_by_id(&self, id: u64) -> RepoResult<Option<Reservation>> {
        let t = self.tables.read();
        Ok(t.reservations
            .get(&id)
            .filter(|r| r.alive())
            .map(|r| r.row.clone()))
    }

    async fn find_by_id_with_details(&self, id: u64) -> RepoResult<Option<Reservation>> {
        let t = self.tables.read();
        Ok(t.reservations
            .get(&id)
            .filter(|r| r.alive())
            .map(|r| t.resolve_details(r.row.clone())))
    }

    async fn find_last_for_room(&self, room_id: u64) -> RepoResult<Option<Reservation>> {
        let t = self.tables.read();
        Ok(t.reservations
            .values()
            .filter(|r| r.alive())
            .map(|r| &r.row)
            .filter(|r| r.rooms.iter().any(|rr| rr.room_id == room_id))
            .max_by_key(|r| (r.stay_end_at, r.id))
            .map(|r| t.resolve_details(r.clone())))
    }

    async fn find_all(
        &self,
        filter: ReservationFilter,
        page: usize,
        size: usize,
    ) -> RepoResult<(Vec<Reservation>, u64)> {
        let t = self.tables.read();
        let mut reservations: Vec<Reservation> = t
            .reservations
            .values()
            .filter(|r| r.alive())
            .map(|r| &r.row)
            .filter(|r| {
                filter
                    .stay_start_at
                    .is_none_or(|from| r.stay_start_at >= from || r.stay_end_at >= from)
            })
            .filter(|r| {
                filter
                    .stay_end_at
                    .is_none_or(|to| r.stay_start_at <= to || r.stay_end_at <= to)
            })
            .filter(|r| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|q| r.name.contains(q) || r.phone.contains(q))
            })
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .filter(|r| {
                filter
                    .reservation_type
                    .is_none_or(|ty| r.reservation_type == ty)
            })
            .cloned()
            .collect();
        reservations.sort_by(|a, b| b.id.cmp(&a.id));
        let total = reservations.len() as u64;
        let page_items = paginate(&reservations, page, size)
            .into_iter()
            .map(|r| t.resolve_details(r))
            .collect();
        Ok((page_items, total))
    }

    async fn statistics(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        period: StatisticsPeriod,
    ) -> RepoResult<Vec<StatPoint>> {
        let t = self.tables.read();
        let mut buckets: BTreeMap<String, (i64, u64, i64, i64)> = BTreeMap::new();

        // Cancelled and refunded bookings are not revenue
        for r in t
            .reservations
            .values()
            .filter(|r| r.alive())
            .map(|r| &r.row)
            .filter(|r| r.is_active())
        {
            let starts_in = r.stay_start_at >= start && r.stay_start_at <= end;
            let ends_in = r.stay_end_at >= start && r.stay_end_at <= end;
            if !starts_in && !ends_in {
                continue;
            }

            let key = match period {
                StatisticsPeriod::Daily => r.stay_start_at.to_string(),
                StatisticsPeriod::Monthly => format!(
                    "{:04}-{:02}",
                    r.stay_start_at.year(),
                    r.stay_start_at.month()
                ),
                StatisticsPeriod::Yearly => format!("{:04}", r.stay_start_at.year()),
            };
            let bucket = buckets.entry(key).or_default();
            bucket.0 += r.price;
            bucket.1 += 1;
            bucket.2 += i64::from(r.people_count);
            bucket.3 += r.stay_days();
        }

        Ok(buckets
            .into_iter()
            .map(|(period, (sales, count, guests, stay_days))| StatPoint {
                period,
                total_sales: sales,
                total_reservations: count,
                total_guests: guests,
                average_stay_days: stay_days as f64 / count as f64,
            })
            .collect())
    }
}

// ========== Audit log ==========

#[async_trait]
impl AuditLogRepository for MemoryStore {
    async fn append(&self, mut entry: AuditLog) -> RepoResult<AuditLog> {
        let mut t = self.tables.write();
        t.next_audit_id += 1;
        entry.id = t.next_audit_id;
        t.audit_logs.push(entry.clone());
        Ok(entry)
    }

    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: u64,
        page: usize,
        size: usize,
    ) -> RepoResult<(Vec<AuditLog>, u64)> {
        let t = self.tables.read();
        let mut entries: Vec<AuditLog> = t
            .audit_logs
            .iter()
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        let total = entries.len() as u64;
        Ok((paginate(&entries, page, size), total))
    }

    async fn find_filtered(
        &self,
        filter: AuditLogFilter,
        page: usize,
        size: usize,
    ) -> RepoResult<(Vec<AuditLog>, u64)> {
        let t = self.tables.read();
        let mut entries: Vec<AuditLog> = t
            .audit_logs
            .iter()
            .filter(|e| {
                filter
                    .entity_type
                    .as_deref()
                    .is_none_or(|ty| e.entity_type == ty)
            })
            .filter(|e| filter.entity_id.is_none_or(|id| e.entity_id == id))
            .filter(|e| filter.action.is_none_or(|a| e.action == a))
            .filter(|e| filter.user_id.is_none_or(|u| e.user_id == Some(u)))
            .filter(|e| filter.from.is_none_or(|from| e.created_at >= from))
            .filter(|e| filter.to.is_none_or(|to| e.created_at <= to))
            .cloned()
            .collect();
        entries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        let total = entries.len() as u64;
        Ok((paginate(&entries, page, size), total))
    }
}

// ========== User directory ==========

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_id(&self, id: u64) -> RepoResult<Option<UserSummary>> {
        let t = self.tables.read();
        Ok(t.users.get(&id).cloned())
    }
}
